use std::collections::HashMap;

/// Records attributed to one resolved owner, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerGroup<T> {
    pub owner: String,
    pub records: Vec<T>,
}

impl<T> OwnerGroup<T> {
    /// Only owners holding more than one LDD are actionable.
    pub fn has_multiple(&self) -> bool {
        self.records.len() > 1
    }
}

/// Group records by owner key. Records whose key resolves to `None` are
/// dropped. Single-record owners are kept; filtering them is up to the caller.
pub fn group_by_owner<T, I, F>(records: I, key_fn: F) -> Vec<OwnerGroup<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<OwnerGroup<T>> = Vec::new();

    for record in records {
        let Some(owner) = key_fn(&record) else {
            continue;
        };
        match index.get(&owner) {
            Some(&i) => groups[i].records.push(record),
            None => {
                index.insert(owner.clone(), groups.len());
                groups.push(OwnerGroup {
                    owner,
                    records: vec![record],
                });
            }
        }
    }

    groups
}
