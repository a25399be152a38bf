//! Protocol identity reported to the RPC framework.

/// Security protocol name reported by these credentials.
pub const SECURITY_PROTOCOL: &str = "alts";
/// Security protocol version reported by these credentials.
pub const SECURITY_VERSION: &str = "0.1";

/// Protocol identity of a set of transport credentials.
///
/// Returned by value; holders never see another credential's mutations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProtocolInfo {
    /// RPC protocol version, unset at this layer.
    pub protocol_version: String,
    /// Security protocol in use.
    pub security_protocol: String,
    /// Security protocol version.
    pub security_version: String,
    /// Server name override, empty when not overridden.
    pub server_name: String,
}

impl ProtocolInfo {
    pub(crate) fn alts() -> Self {
        Self {
            security_protocol: SECURITY_PROTOCOL.to_string(),
            security_version: SECURITY_VERSION.to_string(),
            ..Default::default()
        }
    }
}
