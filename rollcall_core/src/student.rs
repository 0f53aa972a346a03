use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A validated student triple that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub rollno: i32,
    pub address: String,
}

/// A student as persisted, including the id assigned on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: Uuid,
    pub name: String,
    pub rollno: i32,
    pub address: String,
}

/// Create-only access to the student store.
#[async_trait]
pub trait StudentRepo: Send + Sync {
    async fn create(&self, student: &NewStudent) -> anyhow::Result<StudentRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_wire_keys() {
        let record = StudentRecord {
            id: Uuid::nil(),
            name: "Asha".to_string(),
            rollno: 12,
            address: "12 Lake Rd".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Asha");
        assert_eq!(json["rollno"], 12);
        assert_eq!(json["address"], "12 Lake Rd");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
    }
}
