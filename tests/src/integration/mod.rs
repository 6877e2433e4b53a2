//! End-to-end flows between a wallet, the explorer client and a simulated
//! node connected through [`rm_protocol::FrameTransport`].

pub mod fixtures;
mod flows;
