//! Identity → connection bindings.

use std::collections::HashSet;

use dashmap::DashMap;
use uuid::Uuid;

use super::handle::ConnectionId;

/// Which identity each live connection has announced.
///
/// Holds connection ids only; the handles live in the
/// [`ConnectionPool`](super::ConnectionPool). Process-local and empty at
/// start.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    by_identity: DashMap<Uuid, HashSet<ConnectionId>>,
    owner: DashMap<ConnectionId, Uuid>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `conn_id` to `user_id`. Idempotent; a connection already bound
    /// to another identity moves.
    pub fn bind(&self, user_id: Uuid, conn_id: ConnectionId) {
        let previous = self.owner.insert(conn_id, user_id);
        if let Some(previous) = previous.filter(|p| *p != user_id) {
            self.detach(previous, conn_id);
        }
        self.by_identity.entry(user_id).or_default().insert(conn_id);
    }

    /// Drop whatever binding `conn_id` has. No-op when unbound.
    pub fn unbind(&self, conn_id: &ConnectionId) -> Option<Uuid> {
        let (_, user_id) = self.owner.remove(conn_id)?;
        self.detach(user_id, *conn_id);
        Some(user_id)
    }

    /// Connections currently bound to `user_id`.
    pub fn handles_for(&self, user_id: &Uuid) -> Vec<ConnectionId> {
        self.by_identity
            .get(user_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Identity a connection is bound to.
    pub fn identity_of(&self, conn_id: &ConnectionId) -> Option<Uuid> {
        self.owner.get(conn_id).map(|entry| *entry.value())
    }

    /// Number of identities with at least one bound connection.
    pub fn identity_count(&self) -> usize {
        self.by_identity.len()
    }

    /// Number of bound connections.
    pub fn bound_count(&self) -> usize {
        self.owner.len()
    }

    fn detach(&self, user_id: Uuid, conn_id: ConnectionId) {
        if let Some(mut set) = self.by_identity.get_mut(&user_id) {
            set.remove(&conn_id);
        }
        self.by_identity.remove_if(&user_id, |_, set| set.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let user = Uuid::new_v4();
        let conn = Uuid::new_v4();

        registry.bind(user, conn);
        registry.bind(user, conn);

        assert_eq!(registry.handles_for(&user), vec![conn]);
        assert_eq!(registry.bound_count(), 1);
    }

    #[test]
    fn test_multiple_connections_per_identity() {
        let registry = ConnectionRegistry::new();
        let user = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        registry.bind(user, a);
        registry.bind(user, b);

        let mut handles = registry.handles_for(&user);
        handles.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(handles, expected);
    }

    #[test]
    fn test_rebind_moves_connection() {
        let registry = ConnectionRegistry::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let conn = Uuid::new_v4();

        registry.bind(alice, conn);
        registry.bind(bob, conn);

        assert!(registry.handles_for(&alice).is_empty());
        assert_eq!(registry.handles_for(&bob), vec![conn]);
        assert_eq!(registry.identity_of(&conn), Some(bob));
        assert_eq!(registry.identity_count(), 1);
    }

    #[test]
    fn test_unbind() {
        let registry = ConnectionRegistry::new();
        let user = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        registry.bind(user, a);
        registry.bind(user, b);

        assert_eq!(registry.unbind(&a), Some(user));
        assert_eq!(registry.handles_for(&user), vec![b]);

        assert_eq!(registry.unbind(&b), Some(user));
        assert!(registry.handles_for(&user).is_empty());
        assert_eq!(registry.identity_count(), 0);

        assert_eq!(registry.unbind(&Uuid::new_v4()), None);
    }
}
