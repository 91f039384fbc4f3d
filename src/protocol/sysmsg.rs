//! # System Messages
//!
//! Session lifecycle events raised by peers. They are ordinary binary
//! messages registered under `packwire.<Name>`, so they can be queued and
//! dispatched through the same path as application messages.

use crate::binary_struct;
use crate::codec::{BinaryCodec, CodecRegistry};
use crate::error::Result;
use crate::protocol::registry::MessageRegistry;

binary_struct! {
    /// An acceptor accepted an incoming session
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SessionAccepted {}
}

binary_struct! {
    /// A connector established its session
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SessionConnected {}
}

binary_struct! {
    /// A connector failed to connect
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SessionConnectError {}
}

binary_struct! {
    /// A session was closed
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SessionClosed {
        pub reason: i32,
    }
}

impl SessionClosed {
    /// Closed by an I/O error or the remote end
    pub const REASON_IO: i32 = 0;
    /// Closed locally on request
    pub const REASON_MANUAL: i32 = 1;
}

binary_struct! {
    /// The remote end asked for the session to be closed
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SessionCloseNotify {}
}

binary_struct! {
    /// A session finished initialization and can carry traffic
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SessionInit {}
}

/// Register every system message with the binary codec
pub fn register_system_messages(registry: &MessageRegistry, codecs: &CodecRegistry) -> Result<()> {
    let binary = codecs.require(BinaryCodec::NAME)?;

    registry.register::<SessionAccepted>("packwire.SessionAccepted", binary.clone())?;
    registry.register::<SessionConnected>("packwire.SessionConnected", binary.clone())?;
    registry.register::<SessionConnectError>("packwire.SessionConnectError", binary.clone())?;
    registry.register::<SessionClosed>("packwire.SessionClosed", binary.clone())?;
    registry.register::<SessionCloseNotify>("packwire.SessionCloseNotify", binary.clone())?;
    registry.register::<SessionInit>("packwire.SessionInit", binary)?;
    Ok(())
}
