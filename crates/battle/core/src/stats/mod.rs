//! Stat system: attributes, elements and the level curve.
//!
//! ```text
//! [ Category base / top stats ]  (class + race)
//!      ↓  elemental curve multipliers
//! [ base / base_max ]
//!      ↓  level interpolation along the exp curve
//! [ curr_max ]
//!      ↓  + equipment
//! [ temp_max ]  ≥  curr
//! ```

pub mod attributes;
pub mod element;
pub mod level;

pub use attributes::{Attribute, AttributeSet};
pub use element::{Curve, Element, ElementSet, ElementalEdge};
pub use level::ExpTable;
