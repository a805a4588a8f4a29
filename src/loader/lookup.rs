//! Foreign-key resolution against a lookup collection
//!
//! Some datasets reference a remote entity by id (an employment record points
//! at an OKVED section) while the source only carries the entity's name. The
//! join upserts the missing names, then maps every name to its remote id.

use crate::client::DatasetApi;
use crate::table::{Record, Rejection};
use eyre::{Result, WrapErr};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// Builds the create payload for a lookup entry from its label
pub type SeedFn = fn(&str) -> Value;

/// Configuration of one lookup join
#[derive(Debug, Clone)]
pub struct LookupJoin {
    /// Lookup collection, e.g. `okved_sections/`
    pub resource: String,
    /// Record field holding the label to resolve
    pub label_field: String,
    /// Field of a lookup entry holding its label
    pub name_field: String,
    /// Field of a lookup entry holding its id
    pub id_field: String,
    /// Record field the resolved id is written to
    pub target_field: String,
    pub seed: SeedFn,
}

/// Resolved label to remote id mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    ids: HashMap<String, Value>,
}

impl LookupTable {
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.ids.get(label.trim())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl LookupJoin {
    fn label_of<'a>(&self, entry: &'a Value) -> Option<&'a str> {
        entry
            .get(&self.name_field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Make sure every label exists remotely and return the full mapping
    ///
    /// Only labels absent from the first listing are created. Labels the
    /// first listing already had resolve to the id listed first; the rest
    /// come from a second listing, so entries created by someone else in
    /// the meantime are picked up too.
    ///
    /// # Errors
    /// Listing failures are fatal. A failed create is only logged; its label
    /// stays unresolved.
    pub async fn resolve<A: DatasetApi>(&self, api: &A, labels: &[String]) -> Result<LookupTable> {
        let existing = api
            .list(&self.resource)
            .await
            .wrap_err_with(|| format!("Failed to list lookup collection {}", self.resource))?;
        let known: BTreeSet<&str> = existing.iter().filter_map(|e| self.label_of(e)).collect();

        let missing: BTreeSet<&str> = labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty() && !known.contains(l))
            .collect();
        if !missing.is_empty() {
            log::info!(
                "Creating {} missing lookup entries in {}",
                missing.len(),
                self.resource
            );
        }

        for label in missing {
            match api.create(&self.resource, &(self.seed)(label)).await {
                Ok(response) if response.status.is_success() => {
                    log::debug!("Created lookup entry '{}'", label);
                }
                Ok(response) => log::warn!(
                    "Failed to create lookup entry '{}' ({}): {}",
                    label,
                    response.status,
                    response.body
                ),
                Err(e) => log::warn!("Failed to create lookup entry '{}': {}", label, e),
            }
        }

        let current = api
            .list(&self.resource)
            .await
            .wrap_err_with(|| format!("Failed to list lookup collection {}", self.resource))?;

        // Entries seen in the first listing keep their id; duplicates created
        // since then never replace it
        let mut ids = HashMap::new();
        for entry in existing.iter().chain(&current) {
            let Some(label) = self.label_of(entry) else {
                continue;
            };
            if let Some(id) = entry.get(&self.id_field).filter(|id| !id.is_null()) {
                ids.entry(label.to_string()).or_insert_with(|| id.clone());
            }
        }

        let table = LookupTable { ids };
        log::debug!("Resolved {} lookup label(s) from {}", table.len(), self.resource);
        Ok(table)
    }

    /// Labels carried by a set of records, in first-seen order
    pub fn labels<'a>(&self, records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
        let mut seen = BTreeSet::new();
        records
            .into_iter()
            .filter_map(|r| r.get(&self.label_field).and_then(Value::as_str))
            .filter(|label| seen.insert(*label))
            .map(str::to_string)
            .collect()
    }

    /// Write the resolved id into a record
    pub fn attach(&self, mut record: Record, table: &LookupTable) -> Result<Record, Rejection> {
        let label = record
            .get(&self.label_field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match table.get(&label) {
            Some(id) => {
                record.insert(self.target_field.clone(), id.clone());
                Ok(record)
            }
            None => Err(Rejection::UnresolvedLabel {
                field: self.label_field.clone(),
                label,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn join() -> LookupJoin {
        LookupJoin {
            resource: "okved_sections/".to_string(),
            label_field: "okved_group".to_string(),
            name_field: "okved_section_name".to_string(),
            id_field: "id".to_string(),
            target_field: "okved_section_id".to_string(),
            seed: |label| json!({ "okved_section_name": label }),
        }
    }

    fn record(label: &str) -> Record {
        json!({ "year": 2010, "okved_group": label })
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_labels_unique_in_order() {
        let records = [record("Строительство"), record("Образование"), record("Строительство")];
        assert_eq!(join().labels(&records), vec!["Строительство", "Образование"]);
    }

    #[test]
    fn test_attach() {
        let lookup = LookupTable {
            ids: HashMap::from([("Образование".to_string(), json!(7))]),
        };
        let attached = join().attach(record("Образование"), &lookup).unwrap();
        assert_eq!(attached["okved_section_id"], json!(7));

        let err = join().attach(record("Строительство"), &lookup).unwrap_err();
        assert_eq!(
            err,
            Rejection::UnresolvedLabel {
                field: "okved_group".to_string(),
                label: "Строительство".to_string()
            }
        );
    }
}
