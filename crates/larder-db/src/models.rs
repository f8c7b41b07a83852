use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Measurement unit for an ingredient. Fixed vocabulary; quantities only
/// make arithmetic sense within a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Piece,
    Gram,
    Milliliter,
    Stick,
    Whole,
    Bag,
    Pack,
    Bowl,
    Slice,
    Can,
    Bunch,
    Cup,
    Tablespoon,
    Teaspoon,
    Clove,
    Head,
    ToTaste,
    Pinch,
}

impl Unit {
    /// All units, in the order they are offered to the user.
    pub const ALL: [Unit; 18] = [
        Self::Piece,
        Self::Gram,
        Self::Milliliter,
        Self::Stick,
        Self::Whole,
        Self::Bag,
        Self::Pack,
        Self::Bowl,
        Self::Slice,
        Self::Can,
        Self::Bunch,
        Self::Cup,
        Self::Tablespoon,
        Self::Teaspoon,
        Self::Clove,
        Self::Head,
        Self::ToTaste,
        Self::Pinch,
    ];
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Piece => "piece",
            Self::Gram => "gram",
            Self::Milliliter => "milliliter",
            Self::Stick => "stick",
            Self::Whole => "whole",
            Self::Bag => "bag",
            Self::Pack => "pack",
            Self::Bowl => "bowl",
            Self::Slice => "slice",
            Self::Can => "can",
            Self::Bunch => "bunch",
            Self::Cup => "cup",
            Self::Tablespoon => "tablespoon",
            Self::Teaspoon => "teaspoon",
            Self::Clove => "clove",
            Self::Head => "head",
            Self::ToTaste => "to_taste",
            Self::Pinch => "pinch",
        };
        f.write_str(s)
    }
}

impl FromStr for Unit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "piece" => Ok(Self::Piece),
            "gram" => Ok(Self::Gram),
            "milliliter" => Ok(Self::Milliliter),
            "stick" => Ok(Self::Stick),
            "whole" => Ok(Self::Whole),
            "bag" => Ok(Self::Bag),
            "pack" => Ok(Self::Pack),
            "bowl" => Ok(Self::Bowl),
            "slice" => Ok(Self::Slice),
            "can" => Ok(Self::Can),
            "bunch" => Ok(Self::Bunch),
            "cup" => Ok(Self::Cup),
            "tablespoon" => Ok(Self::Tablespoon),
            "teaspoon" => Ok(Self::Teaspoon),
            "clove" => Ok(Self::Clove),
            "head" => Ok(Self::Head),
            "to_taste" => Ok(Self::ToTaste),
            "pinch" => Ok(Self::Pinch),
            other => Err(UnitParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Unit`] string.
#[derive(Debug, Clone)]
pub struct UnitParseError(pub String);

impl fmt::Display for UnitParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid unit: {:?}", self.0)
    }
}

impl std::error::Error for UnitParseError {}

// ---------------------------------------------------------------------------

/// Category of a recipe -- the lane it occupies in the weekly planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Main,
    Side,
    Soup,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Main => "main",
            Self::Side => "side",
            Self::Soup => "soup",
        };
        f.write_str(s)
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Self::Main),
            "side" => Ok(Self::Side),
            "soup" => Ok(Self::Soup),
            other => Err(CategoryParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Category`] string.
#[derive(Debug, Clone)]
pub struct CategoryParseError(pub String);

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid category: {:?}", self.0)
    }
}

impl std::error::Error for CategoryParseError {}

// ---------------------------------------------------------------------------

/// Decorative mark attached to a recipe ingredient line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    #[default]
    None,
    Star,
    DoubleCircle,
    Heart,
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Star => "star",
            Self::DoubleCircle => "double_circle",
            Self::Heart => "heart",
        };
        f.write_str(s)
    }
}

impl FromStr for Mark {
    type Err = MarkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "star" => Ok(Self::Star),
            "double_circle" => Ok(Self::DoubleCircle),
            "heart" => Ok(Self::Heart),
            other => Err(MarkParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Mark`] string.
#[derive(Debug, Clone)]
pub struct MarkParseError(pub String);

impl fmt::Display for MarkParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid mark: {:?}", self.0)
    }
}

impl std::error::Error for MarkParseError {}

// ---------------------------------------------------------------------------

/// Day of the week, Sunday first (planner column order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Day {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    /// All days in planner order.
    pub const ALL: [Day; 7] = [
        Self::Sun,
        Self::Mon,
        Self::Tue,
        Self::Wed,
        Self::Thu,
        Self::Fri,
        Self::Sat,
    ];
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sun => "sun",
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
        };
        f.write_str(s)
    }
}

impl FromStr for Day {
    type Err = DayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sun" => Ok(Self::Sun),
            "mon" => Ok(Self::Mon),
            "tue" => Ok(Self::Tue),
            "wed" => Ok(Self::Wed),
            "thu" => Ok(Self::Thu),
            "fri" => Ok(Self::Fri),
            "sat" => Ok(Self::Sat),
            other => Err(DayParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Day`] string.
#[derive(Debug, Clone)]
pub struct DayParseError(pub String);

impl fmt::Display for DayParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid day: {:?}", self.0)
    }
}

impl std::error::Error for DayParseError {}

// ---------------------------------------------------------------------------

/// Meal slot within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Lunch,
    Dinner,
}

impl Slot {
    /// Both slots in planner order.
    pub const ALL: [Slot; 2] = [Self::Lunch, Self::Dinner];
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        };
        f.write_str(s)
    }
}

impl FromStr for Slot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            other => Err(SlotParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Slot`] string.
#[derive(Debug, Clone)]
pub struct SlotParseError(pub String);

impl fmt::Display for SlotParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid slot: {:?}", self.0)
    }
}

impl std::error::Error for SlotParseError {}

// ---------------------------------------------------------------------------
// Plan keys
// ---------------------------------------------------------------------------

/// Address of one cell in the weekly plan: day, meal slot, and category lane.
///
/// Rendered as `"{day}-{slot}-{category}"` (e.g. `mon-dinner-soup`), which is
/// the key format of the plan document's entries map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanKey {
    pub day: Day,
    pub slot: Slot,
    pub category: Category,
}

impl PlanKey {
    pub fn new(day: Day, slot: Slot, category: Category) -> Self {
        Self {
            day,
            slot,
            category,
        }
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.day, self.slot, self.category)
    }
}

impl FromStr for PlanKey {
    type Err = PlanKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let (Some(day), Some(slot), Some(category)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(PlanKeyParseError(s.to_owned()));
        };
        let day: Day = day.parse().map_err(|_| PlanKeyParseError(s.to_owned()))?;
        let slot: Slot = slot.parse().map_err(|_| PlanKeyParseError(s.to_owned()))?;
        let category: Category = category
            .parse()
            .map_err(|_| PlanKeyParseError(s.to_owned()))?;
        Ok(Self {
            day,
            slot,
            category,
        })
    }
}

/// Error returned when parsing an invalid [`PlanKey`] string.
#[derive(Debug, Clone)]
pub struct PlanKeyParseError(pub String);

impl fmt::Display for PlanKeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid plan key {:?} (expected \"day-slot-category\", e.g. \"mon-dinner-soup\")",
            self.0
        )
    }
}

impl std::error::Error for PlanKeyParseError {}

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A catalog ingredient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub unit: Unit,
    pub exclude_from_list: bool,
    pub created_at: DateTime<Utc>,
}

/// One ingredient line within a recipe document.
///
/// `label` and `unit` are denormalized from the catalog at write time so the
/// recipe renders without a catalog lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient_id: Uuid,
    pub label: String,
    pub unit: Unit,
    pub quantity: f64,
    #[serde(default)]
    pub mark: Mark,
}

/// A recipe -- stored as a whole document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub ingredients: Json<Vec<RecipeIngredient>>,
    pub steps: Json<Vec<String>>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The weekly plan document: slot-key strings mapped to recipe ids, plus the
/// free-text memo. A single row (id `"current"`) exists per installation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeeklyPlan {
    pub id: String,
    pub entries: Json<BTreeMap<String, Uuid>>,
    pub memo: String,
    pub updated_at: DateTime<Utc>,
}

impl WeeklyPlan {
    /// An empty plan document with the given id.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Json(BTreeMap::new()),
            memo: String::new(),
            updated_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_display_roundtrip() {
        for v in &Unit::ALL {
            let s = v.to_string();
            let parsed: Unit = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn unit_invalid() {
        let result = "furlong".parse::<Unit>();
        assert!(result.is_err());
    }

    #[test]
    fn category_display_roundtrip() {
        let variants = [Category::Main, Category::Side, Category::Soup];
        for v in &variants {
            let s = v.to_string();
            let parsed: Category = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn category_invalid() {
        let result = "dessert".parse::<Category>();
        assert!(result.is_err());
    }

    #[test]
    fn mark_display_roundtrip() {
        let variants = [Mark::None, Mark::Star, Mark::DoubleCircle, Mark::Heart];
        for v in &variants {
            let s = v.to_string();
            let parsed: Mark = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn mark_defaults_to_none() {
        assert_eq!(Mark::default(), Mark::None);
    }

    #[test]
    fn day_display_roundtrip() {
        for v in &Day::ALL {
            let s = v.to_string();
            let parsed: Day = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn slot_display_roundtrip() {
        for v in &Slot::ALL {
            let s = v.to_string();
            let parsed: Slot = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn plan_key_display_roundtrip() {
        let key = PlanKey::new(Day::Mon, Slot::Dinner, Category::Soup);
        assert_eq!(key.to_string(), "mon-dinner-soup");
        let parsed: PlanKey = "mon-dinner-soup".parse().expect("should parse");
        assert_eq!(parsed, key);
    }

    #[test]
    fn plan_key_invalid() {
        assert!("mon-dinner".parse::<PlanKey>().is_err());
        assert!("mon-brunch-soup".parse::<PlanKey>().is_err());
        assert!("someday-lunch-main".parse::<PlanKey>().is_err());
    }

    #[test]
    fn recipe_ingredient_mark_defaults_in_json() {
        let line: RecipeIngredient = serde_json::from_value(serde_json::json!({
            "ingredient_id": "550e8400-e29b-41d4-a716-446655440000",
            "label": "potato",
            "unit": "piece",
            "quantity": 2.0
        }))
        .expect("should deserialize without mark");
        assert_eq!(line.mark, Mark::None);
    }

    #[test]
    fn empty_plan_has_no_entries() {
        let plan = WeeklyPlan::empty("current");
        assert!(plan.entries.0.is_empty());
        assert!(plan.memo.is_empty());
    }
}
