//! Core types for the Warren tick engine.
//!
//! This is the leaf crate with zero internal dependencies: identifiers,
//! positions, terrain, resource and body-part vocabularies, the
//! normalized intent model, game-balance constants, and the error
//! taxonomy shared by every other crate in the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod body;
pub mod constants;
pub mod error;
pub mod id;
pub mod intent;
pub mod pos;
pub mod resource;
pub mod terrain;

pub use body::{active_parts, body_cost, Body, BodyPart, BodyPartKind, BODYPART_HITS};
pub use constants::*;
pub use error::{StepError, StepFault, StorageError, ValidationError};
pub use id::{GameTime, ObjectId, OrderId, RoomName, UserId};
pub use intent::{
    IntentArgument, IntentEnvelope, IntentFieldValue, IntentRecord, MoveCommand, SpawnOrder,
    TerminalSend,
};
pub use pos::{Direction, RoomPosition, ROOM_SIZE};
pub use resource::ResourceKind;
pub use terrain::{Terrain, TerrainError, TERRAIN_MASK_SWAMP, TERRAIN_MASK_WALL};
