//! # elemental_canvas
//!
//! Desktop host for [`elemental_fx`]: a software-rendered window that shows
//! fire, ice and lightning effects following your hands.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard and mouse drive two
//!   synthetic hands over a generated backdrop.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Keys
//!
//! | Key | Action |
//! |---|---|
//! | `1` / `2` / `3` | Fire & Ice / Lightning / Red & Blue |
//! | `C` | Clear particles and bolts |
//! | `Q` / `Esc` | Quit |
//!
//! ### Simulation controls
//!
//! | Input | Hand |
//! |---|---|
//! | Mouse | Moves the right palm; the left mirrors it |
//! | `Space` (hold) | Open both hands |
//! | `P` (hold) | Pinch both hands |
//! | `L` / `R` | Toggle left / right hand in view |

pub mod logging;
pub mod tracking;
pub mod visualizer;
pub mod app;
