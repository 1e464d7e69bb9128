//! Form domain types
//!
//! The planner form is a fixed record: every choice the user can make is a
//! closed enum, and meal times are a fixed-size set keyed by `MealTime`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

/// File extensions offered as a hint when picking a pantry file
///
/// This is a hint only. Any readable text file is accepted.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".txt", ".csv", ".md", ".json"];

/// Dietary preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diet {
    Omnivore,
    Vegetarian,
    Vegan,
    Pescatarian,
    Keto,
    Paleo,
    GlutenFree,
    DairyFree,
}

impl Diet {
    pub const ALL: [Diet; 8] = [
        Self::Omnivore,
        Self::Vegetarian,
        Self::Vegan,
        Self::Pescatarian,
        Self::Keto,
        Self::Paleo,
        Self::GlutenFree,
        Self::DairyFree,
    ];

    /// Stable kebab-case name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Omnivore => "omnivore",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Pescatarian => "pescatarian",
            Self::Keto => "keto",
            Self::Paleo => "paleo",
            Self::GlutenFree => "gluten-free",
            Self::DairyFree => "dairy-free",
        }
    }
}

/// Who the meals are being planned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserType {
    Student,
    BusyProfessional,
    Family,
    Athlete,
    Senior,
}

impl UserType {
    pub const ALL: [UserType; 5] = [
        Self::Student,
        Self::BusyProfessional,
        Self::Family,
        Self::Athlete,
        Self::Senior,
    ];

    /// Stable kebab-case name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::BusyProfessional => "busy-professional",
            Self::Family => "family",
            Self::Athlete => "athlete",
            Self::Senior => "senior",
        }
    }
}

/// A meal slot in the day
///
/// Declaration order is the canonical order used everywhere a list of meal
/// times is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MealTime {
    Breakfast,
    Brunch,
    Lunch,
    Snack,
    Dinner,
}

impl MealTime {
    pub const ALL: [MealTime; 5] = [Self::Breakfast, Self::Brunch, Self::Lunch, Self::Snack, Self::Dinner];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Brunch => "brunch",
            Self::Lunch => "lunch",
            Self::Snack => "snack",
            Self::Dinner => "dinner",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Whether the model may go beyond the pantry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PantryOption {
    /// Use only ingredients from the pantry list
    #[default]
    PantryOnly,
    /// New ingredients allowed, with a shopping list per recipe
    AllowNew,
}

impl PantryOption {
    pub const ALL: [PantryOption; 2] = [Self::PantryOnly, Self::AllowNew];

    pub fn name(&self) -> &'static str {
        match self {
            Self::PantryOnly => "pantryOnly",
            Self::AllowNew => "allowNew",
        }
    }

    /// The other of the two options
    pub fn toggled(self) -> Self {
        match self {
            Self::PantryOnly => Self::AllowNew,
            Self::AllowNew => Self::PantryOnly,
        }
    }
}

macro_rules! name_display_fromstr {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                debug!(%s, kind = stringify!($ty), "from_str: called");
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        let valid: Vec<&str> = Self::ALL.iter().map(|v| v.name()).collect();
                        format!("unknown {} '{}' (expected one of: {})", stringify!($ty), s, valid.join(", "))
                    })
            }
        }
    };
}

name_display_fromstr!(Diet);
name_display_fromstr!(UserType);
name_display_fromstr!(MealTime);
name_display_fromstr!(PantryOption);

/// Selected meal times, one flag per `MealTime`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MealTimes([bool; 5]);

impl MealTimes {
    pub fn is_selected(&self, meal: MealTime) -> bool {
        self.0[meal.index()]
    }

    pub fn set(&mut self, meal: MealTime, selected: bool) {
        self.0[meal.index()] = selected;
    }

    /// Flip one meal time, leaving the others alone
    pub fn toggle(&mut self, meal: MealTime) {
        let slot = &mut self.0[meal.index()];
        *slot = !*slot;
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|s| *s)
    }

    /// Selected meal times in canonical order, regardless of toggle order
    pub fn selected(&self) -> impl Iterator<Item = MealTime> + '_ {
        MealTime::ALL.into_iter().filter(move |m| self.is_selected(*m))
    }
}

impl FromIterator<MealTime> for MealTimes {
    fn from_iter<I: IntoIterator<Item = MealTime>>(iter: I) -> Self {
        let mut times = Self::default();
        for meal in iter {
            times.set(meal, true);
        }
        times
    }
}

/// Handle to the user's pantry file
///
/// Opaque to the planner: the file is only opened when a submission runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryFile {
    path: PathBuf,
}

impl PantryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for display, falling back to the full path
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Whether the extension is one of `ACCEPTED_EXTENSIONS`
    pub fn has_suggested_extension(&self) -> bool {
        self.path
            .extension()
            .map(|ext| {
                let ext = format!(".{}", ext.to_string_lossy().to_lowercase());
                ACCEPTED_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}

/// Everything the user has entered on the planner form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub file: Option<PantryFile>,
    pub diet: Option<Diet>,
    pub user_type: Option<UserType>,
    pub people: u32,
    pub meal_times: MealTimes,
    pub pantry_option: PantryOption,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            file: None,
            diet: None,
            user_type: None,
            people: 1,
            meal_times: MealTimes::default(),
            pantry_option: PantryOption::default(),
        }
    }
}

impl FormState {
    /// Request readiness: file, diet, user type and at least one meal time
    pub fn is_ready(&self) -> bool {
        let ready = self.file.is_some() && self.diet.is_some() && self.user_type.is_some() && self.meal_times.any();
        debug!(ready, "FormState::is_ready: called");
        ready
    }
}
