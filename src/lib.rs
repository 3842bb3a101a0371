//! # Casimir
//!
//! Interactive 3D visualization of the Casimir effect.
//!
//! Two parallel plates sit in a field of vacuum-fluctuation particles. Red
//! particles live between the plates, green ones outside. As the plates move
//! together, fewer modes fit between them: the red particles thin out and the
//! inward-pointing arrows shrink relative to the outward ones, showing the
//! net pressure that pushes the plates together.
//!
//! ## Quick Start
//!
//! ```ignore
//! use casimir::prelude::*;
//!
//! fn main() -> Result<(), DemoError> {
//!     CasimirDemo::new()
//!         .with_particle_count(2000)
//!         .with_speed(1.5)
//!         .run()
//! }
//! ```
//!
//! ## Controls
//!
//! - **Demonstrate (Stage 1)** moves the plates to a separation of 5
//! - **Demonstrate (Stage 2)** brings them into contact
//! - **Reset** snaps them back to a separation of 10
//! - The speed slider scales how fast the next transition runs
//! - Left-drag orbits the camera, the scroll wheel zooms
//!
//! Buttons are ignored while a transition is running.
//!
//! ## Headless use
//!
//! Everything except [`CasimirDemo::run`] works without a window. [`Scene`]
//! owns the full simulation state and can be stepped directly:
//!
//! ```ignore
//! let mut scene = Scene::new(&DemoConfig { seed: Some(1), ..Default::default() });
//! scene.demonstrate(Stage::Narrow);
//! scene.update(Duration::from_millis(16));
//! println!("{}", scene.separation_label());
//! ```

pub mod arrows;
mod demo;
pub mod error;
mod gpu;
pub mod mesh;
pub mod particles;
pub mod plates;
pub mod ruler;
pub mod scene;
pub mod time;
pub mod transition;
pub mod tween;
mod ui;

pub use demo::{CasimirDemo, DemoConfig};
pub use error::{DemoError, GpuError};
pub use glam::{Vec2, Vec3};
pub use gpu::{project_to_screen, Camera};
pub use scene::{Scene, UiAction};
pub use transition::Stage;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use casimir::prelude::*;
/// ```
pub mod prelude {
    pub use crate::arrows::{Arrow, ArrowRole, ArrowSet};
    pub use crate::particles::{Particle, ParticleClass, ParticleField};
    pub use crate::plates::PlatePair;
    pub use crate::ruler::Ruler;
    pub use crate::transition::{Animator, Transition};
    pub use crate::tween::Tween;
    pub use crate::{CasimirDemo, DemoConfig, DemoError, Scene, Stage, UiAction};
    pub use crate::{Vec2, Vec3};
}
