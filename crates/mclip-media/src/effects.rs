//! Effect chain parsing and application.
//!
//! Effect strings look like `speed:1.5,fadein:0.5,fadeout:0.5`. Parsing is
//! lenient: malformed tokens are logged and skipped, never fatal.

use mclip_models::{EffectChain, EffectKind, EffectSpec};
use tracing::{debug, warn};

use crate::engine::RenderEngine;
use crate::error::{MediaError, MediaResult};

/// Parse an effect specification into an ordered chain.
///
/// Skips (with a warning) tokens that lack exactly one `:`, carry a
/// non-numeric or non-finite value, or name an unknown effect. Duplicate
/// kinds are kept and applied in order.
pub fn parse_effects(spec: Option<&str>) -> EffectChain {
    let Some(spec) = spec else {
        return EffectChain::new();
    };

    let mut chain = EffectChain::new();

    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let mut parts = token.split(':');
        let (Some(name), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            warn!(token = token, "Skipping effect without a single name:value pair");
            continue;
        };

        let kind = match name.parse::<EffectKind>() {
            Ok(kind) => kind,
            Err(e) => {
                warn!(token = token, error = %e, "Skipping unknown effect");
                continue;
            }
        };

        let parameter = match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                warn!(token = token, "Skipping effect with invalid parameter");
                continue;
            }
        };

        chain.push(EffectSpec::new(kind, parameter));
    }

    debug!(effects = %chain, "Parsed effect chain");
    chain
}

/// Apply `chain` to `clip` in order, stopping at the first failure.
///
/// Engine errors are reported as [`MediaError::EffectApplication`] naming the
/// effect that failed.
pub fn apply_effects<E: RenderEngine>(
    engine: &E,
    clip: E::Clip,
    chain: &EffectChain,
) -> MediaResult<E::Clip> {
    let mut clip = clip;

    for effect in chain {
        let result = match effect.kind {
            EffectKind::Speed => engine.speed(clip, effect.parameter),
            EffectKind::FadeIn => engine.fade_in(clip, effect.parameter),
            EffectKind::FadeOut => engine.fade_out(clip, effect.parameter),
        };

        clip = result.map_err(|e| {
            if e.is_effect_error() {
                e
            } else {
                MediaError::effect_failed(effect.kind, effect.parameter, e.to_string())
            }
        })?;
    }

    Ok(clip)
}
