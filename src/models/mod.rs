mod project;
mod project_role;
mod task;
mod team;
mod user;

pub use project::*;
pub use project_role::*;
pub use task::*;
pub use team::*;
pub use user::*;

/// Add an id to a reference set, keeping set semantics.
pub fn insert_ref(set: &mut Vec<String>, id: &str) -> bool {
    if set.iter().any(|existing| existing == id) {
        return false;
    }
    set.push(id.to_string());
    true
}

/// Remove every occurrence of an id from a reference set.
pub fn remove_ref(set: &mut Vec<String>, id: &str) -> bool {
    let before = set.len();
    set.retain(|existing| existing != id);
    set.len() != before
}
