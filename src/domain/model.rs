use crate::utils::error::{BlendError, Result};
use serde::{Deserialize, Serialize};

/// Largest volume a single component may hold, in liters. Keeps every
/// intermediate product of the blend arithmetic finite.
pub const MAX_VOLUME_LITERS: f64 = 1e12;

/// Relative slack below which a dilution still counts as reachable, so a
/// target equal to the blend's own strength is not flagged by rounding.
const REACHABLE_TOLERANCE: f64 = 1e-9;

/// Liters of absolute alcohol (LAA) held by `volume` liters at `strength` °GL.
pub fn pure_alcohol(volume: f64, strength: f64) -> f64 {
    volume * strength / 100.0
}

/// A component row as it arrives from a file or an operator, before any
/// bounds are enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComponent {
    #[serde(default, alias = "Componente", alias = "Tipo de Alcohol")]
    pub name: String,
    #[serde(alias = "Volumen (L)", alias = "Volumen (Lts)")]
    pub volume: f64,
    #[serde(alias = "Grado (GL)", alias = "°GL")]
    pub strength: f64,
}

/// One row of a blend. Construction guarantees
/// `0 <= volume <= MAX_VOLUME_LITERS` and `0 <= strength <= 100`, both finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComponent")]
pub struct Component {
    name: String,
    volume: f64,
    strength: f64,
}

impl Component {
    pub fn new(name: impl Into<String>, volume: f64, strength: f64) -> Result<Self> {
        if !volume.is_finite() {
            return Err(BlendError::invalid_component("volume", volume, "not a finite number"));
        }
        if volume < 0.0 {
            return Err(BlendError::invalid_component("volume", volume, "cannot be negative"));
        }
        if volume > MAX_VOLUME_LITERS {
            return Err(BlendError::invalid_component(
                "volume",
                volume,
                "exceeds the largest supported volume",
            ));
        }
        if !strength.is_finite() {
            return Err(BlendError::invalid_component("strength", strength, "not a finite number"));
        }
        if !(0.0..=100.0).contains(&strength) {
            return Err(BlendError::invalid_component(
                "strength",
                strength,
                "must be between 0 and 100",
            ));
        }

        Ok(Self {
            name: name.into(),
            volume,
            strength,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn pure_alcohol_content(&self) -> f64 {
        pure_alcohol(self.volume, self.strength)
    }
}

impl TryFrom<RawComponent> for Component {
    type Error = BlendError;

    fn try_from(raw: RawComponent) -> Result<Self> {
        Component::new(raw.name, raw.volume, raw.strength)
    }
}

impl From<&Component> for RawComponent {
    fn from(component: &Component) -> Self {
        RawComponent {
            name: component.name.clone(),
            volume: component.volume,
            strength: component.strength,
        }
    }
}

/// Ordered, editable collection of components. Totals do not depend on row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blend {
    components: Vec<Component>,
}

impl Blend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table an operator starts from: an empty water row and a
    /// thousand liters of 96 °GL base alcohol.
    pub fn default_seed() -> Self {
        Self {
            components: vec![
                Component {
                    name: "Water".to_string(),
                    volume: 0.0,
                    strength: 0.0,
                },
                Component {
                    name: "Base alcohol".to_string(),
                    volume: 1000.0,
                    strength: 96.0,
                },
            ],
        }
    }

    pub fn from_components(components: Vec<Component>) -> Self {
        Self { components }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn push(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn insert(&mut self, index: usize, component: Component) -> Result<()> {
        if index > self.components.len() {
            return Err(self.row_not_found(index));
        }
        self.components.insert(index, component);
        Ok(())
    }

    pub fn update(&mut self, index: usize, component: Component) -> Result<()> {
        let len = self.components.len();
        let slot = self
            .components
            .get_mut(index)
            .ok_or(BlendError::RowNotFound { row: index + 1, len })?;
        *slot = component;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Component> {
        if index >= self.components.len() {
            return Err(self.row_not_found(index));
        }
        Ok(self.components.remove(index))
    }

    pub fn clear(&mut self) {
        self.components.clear();
    }

    pub fn total_volume(&self) -> f64 {
        self.components.iter().map(Component::volume).sum()
    }

    pub fn total_pure_alcohol(&self) -> f64 {
        self.components
            .iter()
            .map(Component::pure_alcohol_content)
            .sum()
    }

    /// Guard for the final-strength query: true when some volume was entered.
    pub fn has_volume(&self) -> bool {
        self.total_volume() > 0.0
    }

    fn row_not_found(&self, index: usize) -> BlendError {
        BlendError::RowNotFound {
            row: index + 1,
            len: self.components.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrengthResult {
    pub final_strength: f64,
    pub total_pure_alcohol: f64,
    pub total_volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DilutionResult {
    /// Water to add, clamped at zero.
    pub water_to_add: f64,
    pub final_volume_needed: f64,
    pub total_pure_alcohol: f64,
    pub total_volume: f64,
    pub target_strength: f64,
}

impl DilutionResult {
    /// False when the blend is already at or below the target strength,
    /// i.e. only adding alcohol could reach it.
    pub fn is_reachable(&self) -> bool {
        self.final_volume_needed - self.total_volume >= -REACHABLE_TOLERANCE * self.total_volume
    }

    /// The unclamped (negative) water amount when dilution cannot reach the target.
    pub fn shortfall(&self) -> Option<f64> {
        let raw = self.final_volume_needed - self.total_volume;
        (!self.is_reachable()).then_some(raw)
    }
}

/// Outcome of one of the two blend queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Calculation {
    Strength(StrengthResult),
    Dilution(DilutionResult),
}
