//! Zoom step table.
//!
//! An ordered, immutable table of 16.16 scale factors indexed by zoom index.
//! The only context-dependent entry is index 0, which a [`QuirkOverride`]
//! may replace.

use std::sync::Arc;

use zoomstep_models::{QuirkContext, ScaleFactor, ZoomIndex};

use crate::error::{ZoomError, ZoomResult};
use crate::quirk::{NoQuirk, QuirkOverride};

/// Reference table: 61 stages from 1.0x to 8.0x.
pub const REFERENCE_ZOOM_STEPS: [u32; 61] = [
    65536, 68157, 70124, 72745, 75366, 77988, 80609, 83231, 86508, 89784, 92406, 95683, 99615,
    102892, 106168, 110100, 114033, 117965, 122552, 126484, 131072, 135660, 140247, 145490,
    150733, 155976, 161219, 167117, 173015, 178913, 185467, 192020, 198574, 205783, 212992,
    220201, 228065, 236585, 244449, 252969, 262144, 271319, 281149, 290980, 300810, 311951,
    322437, 334234, 346030, 357827, 370934, 384041, 397148, 411566, 425984, 441057, 456131,
    472515, 488899, 506593, 524288,
];

/// Ordered scale-factor table with an index-0 override.
#[derive(Debug, Clone)]
pub struct ZoomStepTable {
    steps: Arc<[ScaleFactor]>,
    quirk: Arc<dyn QuirkOverride>,
}

impl ZoomStepTable {
    /// Build a table from raw 16.16 values.
    ///
    /// Fails if the list is empty or not strictly increasing.
    pub fn new(steps: &[u32], quirk: Arc<dyn QuirkOverride>) -> ZoomResult<Self> {
        if steps.is_empty() {
            return Err(ZoomError::invalid_table("table has no steps"));
        }

        if let Some(pos) = steps.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ZoomError::invalid_table(format!(
                "step {} ({}) is not greater than step {} ({})",
                pos + 1,
                steps[pos + 1],
                pos,
                steps[pos]
            )));
        }

        Ok(Self {
            steps: steps.iter().copied().map(ScaleFactor::from_raw).collect(),
            quirk,
        })
    }

    /// The 61-stage reference table with no quirk.
    pub fn reference() -> Self {
        Self::reference_with_quirk(Arc::new(NoQuirk))
    }

    /// The 61-stage reference table with the given quirk.
    pub fn reference_with_quirk(quirk: Arc<dyn QuirkOverride>) -> Self {
        Self {
            steps: REFERENCE_ZOOM_STEPS
                .iter()
                .copied()
                .map(ScaleFactor::from_raw)
                .collect(),
            quirk,
        }
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Highest valid index.
    pub fn max_index(&self) -> ZoomIndex {
        self.steps.len() - 1
    }

    /// Raw table value, ignoring the quirk override.
    pub fn baseline(&self, index: ZoomIndex) -> Option<ScaleFactor> {
        self.steps.get(index).copied()
    }

    /// Name of the installed quirk override.
    pub fn quirk_name(&self) -> &'static str {
        self.quirk.name()
    }

    /// Resolve the scale written to hardware for `index` under `context`.
    pub fn scale_factor_for(&self, index: ZoomIndex, context: &QuirkContext) -> ZoomResult<ScaleFactor> {
        let base = self.baseline(index).ok_or_else(|| ZoomError::OutOfRange {
            index: index as i64,
            max: self.steps.len(),
        })?;

        if index != 0 {
            return Ok(base);
        }

        Ok(self.quirk.override_base_scale(context).unwrap_or(base))
    }
}
