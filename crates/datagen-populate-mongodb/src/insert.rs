//! Document conversion and error classification for MongoDB inserts.

use bson::{Bson, Document};
use datagen_engine::StorageError;
use datagen_generator::Family;
use mongodb::error::{CommandError, ErrorKind, WriteConcernError, WriteError, WriteFailure};

/// Server code for "TooManyRequests" (Cosmos DB request rate exceeded).
pub const TOO_MANY_REQUESTS: i32 = 16500;

/// HTTP-style throttle code surfaced by some gateways.
pub const HTTP_TOO_MANY_REQUESTS: i32 = 429;

/// Server codes meaning the backend could not serve the request right now.
const UNAVAILABLE_CODES: &[i32] = &[
    6,     // HostUnreachable
    7,     // HostNotFound
    89,    // NetworkTimeout
    91,    // ShutdownInProgress
    189,   // PrimarySteppedDown
    9001,  // SocketException
    10107, // NotWritablePrimary
    11600, // InterruptedAtShutdown
    11602, // InterruptedDueToReplStateChange
    13435, // NotPrimaryNoSecondaryOk
    13436, // NotPrimaryOrSecondary
];

/// Convert a family into the BSON document stored in the collection.
pub fn family_to_document(family: &Family) -> Result<Document, bson::ser::Error> {
    let mut document = bson::to_document(family)?;
    document.insert("_id", family.id.clone());
    Ok(document)
}

/// Read a numeric field regardless of its BSON width.
pub fn read_number(document: &Document, key: &str) -> Option<f64> {
    match document.get(key)? {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}

/// Map a server error code (and message) onto a storage failure kind.
pub fn classify_code(code: i32, message: String) -> StorageError {
    if code == TOO_MANY_REQUESTS
        || code == HTTP_TOO_MANY_REQUESTS
        || message.contains("TooManyRequests")
        || message.contains("Request rate is large")
    {
        StorageError::Throttled(message)
    } else if UNAVAILABLE_CODES.contains(&code) {
        StorageError::Unavailable(message)
    } else {
        StorageError::Unknown(message)
    }
}

/// Map a driver error onto a storage failure kind.
pub fn classify_error(err: &mongodb::error::Error) -> StorageError {
    let message = err.to_string();
    match err.kind.as_ref() {
        ErrorKind::Command(CommandError { code, .. }) => classify_code(*code, message),
        ErrorKind::Write(WriteFailure::WriteError(WriteError { code, .. })) => {
            classify_code(*code, message)
        }
        ErrorKind::Write(WriteFailure::WriteConcernError(WriteConcernError { code, .. })) => {
            classify_code(*code, message)
        }
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => StorageError::Unavailable(message),
        _ => StorageError::Unknown(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use datagen_generator::DocumentGenerator;

    #[test]
    fn test_family_to_document() {
        let family = DocumentGenerator::seeded(42).generate();
        let document = family_to_document(&family).unwrap();

        assert_eq!(document.get_str("_id").unwrap(), family.id);
        assert_eq!(document.get_str("id").unwrap(), family.id);
        assert_eq!(document.get_str("LastName").unwrap(), family.last_name);
        assert_eq!(document.get_array("Parents").unwrap().len(), 2);

        let children = document.get_array("Children").unwrap();
        let child = children[0].as_document().unwrap();
        assert_eq!(child.get_i32("Grade").unwrap(), family.children[0].grade);
        assert_eq!(child.get_array("Pets").unwrap().len(), 1);
    }

    #[test]
    fn test_read_number() {
        let document = doc! {
            "double": 5.71,
            "int": 400_i32,
            "long": 10_000_i64,
            "text": "n/a",
        };

        assert_eq!(read_number(&document, "double"), Some(5.71));
        assert_eq!(read_number(&document, "int"), Some(400.0));
        assert_eq!(read_number(&document, "long"), Some(10_000.0));
        assert_eq!(read_number(&document, "text"), None);
        assert_eq!(read_number(&document, "missing"), None);
    }

    #[test]
    fn test_classify_throttle_codes() {
        assert!(matches!(
            classify_code(TOO_MANY_REQUESTS, "TooManyRequests".to_string()),
            StorageError::Throttled(_)
        ));
        assert!(matches!(
            classify_code(HTTP_TOO_MANY_REQUESTS, String::new()),
            StorageError::Throttled(_)
        ));
        assert!(matches!(
            classify_code(2, "Request rate is large. More Request Units may be needed".to_string()),
            StorageError::Throttled(_)
        ));
    }

    #[test]
    fn test_classify_other_codes() {
        assert!(matches!(
            classify_code(91, "shutting down".to_string()),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            classify_code(11000, "E11000 duplicate key".to_string()),
            StorageError::Unknown(_)
        ));
    }
}
