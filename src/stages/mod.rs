//! Built-in stage implementations.
//!
//! Four stages cover the canonical template chain: an atmospheric-flux
//! source, a two-flavor oscillation transform, an effective-area scaling,
//! and a particle-ID split. Each is deliberately simple numerically — the
//! contract they exercise (construction from a parameter record, declared
//! binnings, capability tag) is what the pipeline core depends on.
//!
//! [`register_builtins`] wires them into a [`StageRegistry`] under their
//! (category, service) names:
//!
//! | Category | Service      | Kind      |
//! |----------|--------------|-----------|
//! | `flux`   | `honda`      | source    |
//! | `osc`    | `two_flavor` | transform |
//! | `aeff`   | `scale`      | transform |
//! | `pid`    | `fraction`   | transform |

pub mod aeff;
pub mod flux;
pub mod osc;
pub mod pid;

use crate::pipeline::registry::StageRegistry;

/// Register every built-in stage.
pub fn register_builtins(registry: &mut StageRegistry) {
    registry.register("flux", "honda", |params| {
        Ok(Box::new(flux::HondaFlux::from_params(params)?))
    });
    registry.register("osc", "two_flavor", |params| {
        Ok(Box::new(osc::TwoFlavorOsc::from_params(params)?))
    });
    registry.register("aeff", "scale", |params| {
        Ok(Box::new(aeff::AeffScale::from_params(params)?))
    });
    registry.register("pid", "fraction", |params| {
        Ok(Box::new(pid::PidFraction::from_params(params)?))
    });
}
