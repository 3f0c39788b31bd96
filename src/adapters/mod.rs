//! MPC-HC adapters: the media player and remote entities, plus the HTTP
//! client, state normalizer and command table they share.

pub mod client;
pub mod commands;
pub mod handle;
pub mod media_player;
pub mod remote;
pub mod state;
pub mod traits;

pub use handle::PollHandle;
pub use media_player::MpcHcMediaPlayer;
pub use remote::MpcHcRemote;
pub use traits::*;
