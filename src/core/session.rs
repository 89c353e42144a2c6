use crate::core::engine::{compute_final_strength, compute_water_to_add};
use crate::core::report::Report;
use crate::domain::model::{Blend, Calculation, Component, DilutionResult, StrengthResult};
use crate::utils::error::Result;
use crate::utils::format::NumberStyle;

pub const DEFAULT_TARGET_STRENGTH: f64 = 40.0;

/// The editable table of one operator session together with the last
/// result computed from it.
#[derive(Debug, Clone)]
pub struct BlendSession {
    blend: Blend,
    target_strength: f64,
    last_calculation: Option<Calculation>,
}

impl Default for BlendSession {
    fn default() -> Self {
        Self::new(Blend::default_seed())
    }
}

impl BlendSession {
    pub fn new(blend: Blend) -> Self {
        Self {
            blend,
            target_strength: DEFAULT_TARGET_STRENGTH,
            last_calculation: None,
        }
    }

    pub fn blend(&self) -> &Blend {
        &self.blend
    }

    pub fn components(&self) -> &[Component] {
        self.blend.components()
    }

    pub fn target_strength(&self) -> f64 {
        self.target_strength
    }

    pub fn set_target_strength(&mut self, target: f64) {
        self.target_strength = target;
    }

    pub fn last_calculation(&self) -> Option<&Calculation> {
        self.last_calculation.as_ref()
    }

    pub fn add_component(&mut self, component: Component) {
        tracing::debug!(name = component.name(), "adding component");
        self.blend.push(component);
        self.invalidate();
    }

    /// Replaces the row at `index` (0-based).
    pub fn update_component(&mut self, index: usize, component: Component) -> Result<()> {
        self.blend.update(index, component)?;
        self.invalidate();
        Ok(())
    }

    /// Removes the row at `index` (0-based).
    pub fn remove_component(&mut self, index: usize) -> Result<Component> {
        let removed = self.blend.remove(index)?;
        tracing::debug!(name = removed.name(), "removed component");
        self.invalidate();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.blend.clear();
        self.invalidate();
    }

    /// Mode 1: final strength of the current table.
    pub fn calculate_strength(&mut self) -> Result<StrengthResult> {
        let result = compute_final_strength(&self.blend)?;
        self.last_calculation = Some(Calculation::Strength(result));
        Ok(result)
    }

    /// Mode 2: water needed to reach `target`, which becomes the session's target.
    pub fn calculate_dilution(&mut self, target: f64) -> Result<DilutionResult> {
        let result = compute_water_to_add(&self.blend, target)?;
        self.target_strength = target;
        if !result.is_reachable() {
            tracing::warn!(
                target_strength = target,
                total_volume = result.total_volume,
                final_volume_needed = result.final_volume_needed,
                "target strength cannot be reached by adding water"
            );
        }
        self.last_calculation = Some(Calculation::Dilution(result));
        Ok(result)
    }

    /// Report for the last calculation, or `None` if nothing has been
    /// computed since the table last changed.
    pub fn report(&self, title: &str, style: NumberStyle) -> Option<Report> {
        self.last_calculation
            .map(|calculation| Report::new(title, &self.blend, calculation, style))
    }

    fn invalidate(&mut self) {
        self.last_calculation = None;
    }
}
