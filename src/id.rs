use uuid::Uuid;

/// Generate a fresh entity id. v7 keeps ids roughly insert-ordered, which
/// keeps the storage b-trees happy.
pub fn new_uuid_v7() -> String {
    Uuid::now_v7().to_string()
}
