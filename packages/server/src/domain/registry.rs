//! Ordered set of currently joined connections.

use super::{
    connection::Connection,
    error::RegistryError,
    identity::ConnectionId,
};

/// Connection registry
///
/// Iteration order is join order. Ids are unique within the registry.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Vec<Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.iter().any(|c| c.id() == id)
    }

    /// Append a connection at the end of the join order.
    pub fn insert(&mut self, connection: Connection) -> Result<(), RegistryError> {
        if self.contains(connection.id()) {
            return Err(RegistryError::DuplicateConnection(connection.id().value()));
        }
        self.connections.push(connection);
        Ok(())
    }

    /// Remove a connection, keeping the order of the rest.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id() == id)?;
        Some(self.connections.remove(index))
    }

    /// Broadcast targets: every connection except `origin`, in join order.
    ///
    /// With `origin` unset every registered connection is a target.
    pub fn broadcast_targets(
        &self,
        origin: Option<ConnectionId>,
    ) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| Some(c.id()) != origin)
    }

    pub fn ids(&self) -> Vec<ConnectionId> {
        self.connections.iter().map(Connection::id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Identity;
    use rand::{SeedableRng, rngs::StdRng};
    use tokio::sync::mpsc;

    fn create_test_connection(ordinal: u64) -> Connection {
        let (sender, _receiver) = mpsc::channel(1);
        let identity = Identity::allocate_with(ordinal, &mut StdRng::seed_from_u64(ordinal));
        Connection::new(identity, sender)
    }

    fn registry_with(ordinals: &[u64]) -> ConnectionRegistry {
        let mut registry = ConnectionRegistry::new();
        for &n in ordinals {
            registry.insert(create_test_connection(n)).unwrap();
        }
        registry
    }

    #[test]
    fn test_insert_keeps_join_order() {
        // テスト項目: 登録順が保持される
        // given (前提条件):
        let registry = registry_with(&[0, 1, 2]);

        // when (操作):
        let ids = registry.ids();

        // then (期待する結果):
        assert_eq!(
            ids,
            vec![ConnectionId::new(0), ConnectionId::new(1), ConnectionId::new(2)]
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        // テスト項目: 同じ ID の接続は登録できない
        // given (前提条件):
        let mut registry = registry_with(&[0]);

        // when (操作):
        let result = registry.insert(create_test_connection(0));

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::DuplicateConnection(0)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order_of_rest() {
        // テスト項目: 削除後も残りの接続の順序が保持される
        // given (前提条件):
        let mut registry = registry_with(&[0, 1, 2, 3]);

        // when (操作):
        let removed = registry.remove(ConnectionId::new(1));

        // then (期待する結果):
        assert_eq!(removed.map(|c| c.id()), Some(ConnectionId::new(1)));
        assert_eq!(
            registry.ids(),
            vec![ConnectionId::new(0), ConnectionId::new(2), ConnectionId::new(3)]
        );
    }

    #[test]
    fn test_remove_unknown_id() {
        // テスト項目: 存在しない ID の削除は None を返す
        let mut registry = registry_with(&[0]);
        assert!(registry.remove(ConnectionId::new(9)).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_broadcast_targets_excludes_origin() {
        // テスト項目: 送信元以外の接続が登録順に返される
        // given (前提条件):
        let registry = registry_with(&[0, 1, 2]);

        // when (操作):
        let targets: Vec<ConnectionId> = registry
            .broadcast_targets(Some(ConnectionId::new(1)))
            .map(Connection::id)
            .collect();

        // then (期待する結果):
        assert_eq!(targets, vec![ConnectionId::new(0), ConnectionId::new(2)]);
    }

    #[test]
    fn test_broadcast_targets_without_origin() {
        // テスト項目: 送信元なしの場合は全接続が対象になる
        let registry = registry_with(&[0, 1]);
        assert_eq!(registry.broadcast_targets(None).count(), 2);
    }

    #[test]
    fn test_broadcast_targets_with_empty_registry() {
        // テスト項目: 接続が空の場合、対象も空になる
        let registry = ConnectionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.broadcast_targets(None).count(), 0);
    }
}
