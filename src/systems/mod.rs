//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources.

pub mod audio;
pub mod collision;
pub mod components;
pub mod hud;
pub mod input;
pub mod lifetime;
pub mod movement;
pub mod player;
pub mod spawn;
pub mod state;
pub mod store;

pub use self::audio::*;
pub use self::collision::*;
pub use self::components::*;
pub use self::hud::*;
pub use self::input::*;
pub use self::lifetime::*;
pub use self::movement::*;
pub use self::player::*;
pub use self::spawn::*;
pub use self::state::*;
pub use self::store::*;
