use serde::Serialize;

/// Registry sizes observed by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub connections: usize,
    pub rooms: usize,
    pub replay_len: usize,
}
