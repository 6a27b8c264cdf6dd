//! The hierarchical record inserted by every worker.

use serde::{Deserialize, Serialize};

/// Path of the partition key inside a serialized [`Family`].
pub const PARTITION_KEY_PATH: &str = "/LastName";

/// Root document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Family {
    #[serde(rename = "id")]
    pub id: String,
    /// Partition key value
    pub last_name: String,
    pub parents: Vec<Parent>,
    pub children: Vec<Child>,
    pub address: Address,
}

impl Family {
    /// Value the backend uses to route this document.
    pub fn partition_key(&self) -> &str {
        &self.last_name
    }

    /// Visit every generated string leaf, in document order.
    pub fn string_leaves(&self) -> Vec<&str> {
        let mut leaves = vec![self.id.as_str(), self.last_name.as_str()];
        for parent in &self.parents {
            leaves.push(&parent.first_name);
            leaves.push(&parent.family_name);
        }
        for child in &self.children {
            leaves.push(&child.first_name);
            leaves.push(&child.family_name);
            leaves.push(&child.gender);
            for pet in &child.pets {
                leaves.push(&pet.given_name);
            }
        }
        leaves.push(&self.address.state);
        leaves.push(&self.address.county);
        leaves.push(&self.address.city);
        leaves
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parent {
    pub first_name: String,
    pub family_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Child {
    pub first_name: String,
    pub family_name: String,
    pub gender: String,
    /// Always within 1..=12
    pub grade: i32,
    pub pets: Vec<Pet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pet {
    pub given_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub state: String,
    pub county: String,
    pub city: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Family {
        Family {
            id: "id-1".to_string(),
            last_name: "pk-1".to_string(),
            parents: vec![
                Parent {
                    first_name: "p1".to_string(),
                    family_name: "f1".to_string(),
                },
                Parent {
                    first_name: "p2".to_string(),
                    family_name: "f2".to_string(),
                },
            ],
            children: vec![Child {
                first_name: "c".to_string(),
                family_name: "cf".to_string(),
                gender: "g".to_string(),
                grade: 7,
                pets: vec![Pet {
                    given_name: "pet".to_string(),
                }],
            }],
            address: Address {
                state: "s".to_string(),
                county: "co".to_string(),
                city: "ci".to_string(),
            },
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["id"], "id-1");
        assert_eq!(json["LastName"], "pk-1");
        assert_eq!(json["Parents"][1]["FamilyName"], "f2");
        assert_eq!(json["Children"][0]["Grade"], 7);
        assert_eq!(json["Children"][0]["Pets"][0]["GivenName"], "pet");
        assert_eq!(json["Address"]["County"], "co");
    }

    #[test]
    fn test_partition_key_matches_path() {
        let family = sample();
        let json = serde_json::to_value(&family).unwrap();
        let field = PARTITION_KEY_PATH.trim_start_matches('/');

        assert_eq!(json[field], family.partition_key());
    }

    #[test]
    fn test_string_leaves() {
        let family = sample();
        let leaves = family.string_leaves();
        // id, partition key, 2x2 parent names, 3 child strings, 1 pet, 3 address
        assert_eq!(leaves.len(), 13);
        assert_eq!(leaves[0], "id-1");
        assert_eq!(leaves[12], "ci");
    }
}
