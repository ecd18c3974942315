//! group -> instance -> result, with every slot reserved up front.
//!
//! Reserving needs `&mut ResultStore`, so all slots exist before any handle
//! is handed to a worker. Each handle owns a write-once cell; workers never
//! touch the maps themselves.

use {
    crate::{
        error::{HarnessError, Result},
        invoker::InvocationResult,
    },
    once_cell::sync::OnceCell,
    std::{collections::BTreeMap, sync::Arc},
};

type Slot = Arc<OnceCell<InvocationResult>>;

#[derive(Debug, Default)]
pub struct ResultStore {
    groups: BTreeMap<String, BTreeMap<String, Slot>>,
}

/// The right to fill one reserved slot.
#[derive(Clone, Debug)]
pub struct SlotHandle {
    group: String,
    instance: String,
    slot: Slot,
}

impl SlotHandle {
    pub fn write(&self, result: InvocationResult) -> Result<()> {
        self.slot
            .set(result)
            .map_err(|_| HarnessError::SlotAlreadyWritten {
                group: self.group.clone(),
                instance: self.instance.clone(),
            })
    }
}

impl ResultStore {
    pub fn new() -> Self {
        ResultStore::default()
    }

    /// Make sure `group` is present even if it never gets an instance.
    pub fn reserve_group(&mut self, group: &str) {
        self.groups.entry(group.to_string()).or_default();
    }

    /// Return the slot for `(group, instance)`, creating it if needed.
    pub fn reserve(&mut self, group: &str, instance: &str) -> SlotHandle {
        let slot = self
            .groups
            .entry(group.to_string())
            .or_default()
            .entry(instance.to_string())
            .or_default();
        SlotHandle {
            group: group.to_string(),
            instance: instance.to_string(),
            slot: Arc::clone(slot),
        }
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn num_slots(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }

    /// `(group, instance)` pairs still waiting for a result.
    pub fn pending(&self) -> Vec<(&str, &str)> {
        self.groups
            .iter()
            .flat_map(|(g, instances)| {
                instances
                    .iter()
                    .filter(|(_, slot)| slot.get().is_none())
                    .map(move |(i, _)| (g.as_str(), i.as_str()))
            })
            .collect()
    }

    pub fn snapshot(&self) -> ResultSnapshot {
        let groups = self
            .groups
            .iter()
            .map(|(g, instances)| {
                let results = instances
                    .iter()
                    .map(|(i, slot)| (i.clone(), slot.get().cloned()))
                    .collect();
                (g.clone(), results)
            })
            .collect();
        ResultSnapshot { groups }
    }
}

pub type GroupResults = BTreeMap<String, Option<InvocationResult>>;

/// A read-only copy of a store. `None` marks a slot nobody filled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSnapshot {
    pub groups: BTreeMap<String, GroupResults>,
}

impl ResultSnapshot {
    pub fn get(&self, group: &str, instance: &str) -> Option<&InvocationResult> {
        self.groups.get(group)?.get(instance)?.as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GroupResults)> {
        self.groups.iter()
    }
}
