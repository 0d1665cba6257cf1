use crate::core::tdee::{ActivityLevel, Formula, HeightUnit, Sex, WeightUnit};
use crate::core::tracker::{GoalField, SortDir, SortKey};
use crate::export::ExportFormat;
use crate::models::food::{FoodSource, Macros, Meal};
use crate::models::goals::MacroPreset;
use crate::models::prefs::{Density, Theme, WaterUnit};
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for calstudy:
/// a calorie tracker and a flashcard trainer sharing one SQLite store.
#[derive(Parser)]
#[command(
    name = "calstudy",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track calories and macros, and study flashcards, from the terminal",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Answer yes to every confirmation
    #[arg(global = true, short = 'y', long = "yes")]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },

    /// Calorie and nutrition tracker
    #[command(subcommand)]
    Cal(CalCommand),

    /// Flashcard decks and quizzes
    #[command(subcommand)]
    Study(StudyCommand),
}

// ---------------------------------------------------------------
// Shared argument groups
// ---------------------------------------------------------------

/// Calories and macros of one serving.
#[derive(Args, Debug, Clone, Default)]
pub struct MacroArgs {
    #[arg(long, default_value_t = 0.0)]
    pub calories: f64,
    #[arg(long, default_value_t = 0.0)]
    pub protein: f64,
    #[arg(long, default_value_t = 0.0)]
    pub fat: f64,
    #[arg(long, default_value_t = 0.0)]
    pub carbs: f64,
}

impl MacroArgs {
    pub fn macros(&self) -> Macros {
        Macros::new(self.calories, self.protein, self.fat, self.carbs)
    }
}

// ---------------------------------------------------------------
// cal
// ---------------------------------------------------------------

#[derive(Subcommand)]
pub enum CalCommand {
    /// Show the active day: foods, totals and goal progress
    Show,

    /// Manage days
    #[command(subcommand)]
    Day(DayCommand),

    /// Log, edit and list foods of the active day
    #[command(subcommand)]
    Food(FoodCommand),

    /// Add or remove water (default step from prefs)
    Water {
        /// Amount in the preferred unit; negative to remove
        #[arg(allow_negative_numbers = true)]
        amount: Option<f64>,

        /// Remove instead of adding
        #[arg(long)]
        remove: bool,
    },

    /// Show or change global goals
    #[command(subcommand)]
    Goals(GoalsCommand),

    /// Show or change preferences
    Prefs {
        #[arg(long)]
        water_step: Option<f64>,
        #[arg(long, value_enum)]
        water_unit: Option<WaterUnit>,
        #[arg(long, value_enum)]
        theme: Option<Theme>,
        #[arg(long, value_enum)]
        density: Option<Density>,
        /// auto, breakfast, lunch, dinner or snack
        #[arg(long)]
        default_meal: Option<String>,
    },

    /// Estimate BMR and TDEE
    Tdee(TdeeArgs),

    /// Favorite foods
    #[command(subcommand)]
    Favorite(FavoriteCommand),

    /// Saved recipes
    #[command(subcommand)]
    Recipe(RecipeCommand),

    /// Meal plans by date
    #[command(subcommand)]
    Plan(PlanCommand),

    /// Body measurements
    #[command(subcommand)]
    Measure(MeasureCommand),

    /// Workouts
    #[command(subcommand)]
    Workout(WorkoutCommand),

    /// Averages, streak, top foods and best day
    Insights,

    /// Search FoodData Central; with --pick, log a result
    Search {
        term: String,

        /// 1-based result to log
        #[arg(long)]
        pick: Option<usize>,

        /// 1-based serving option of the picked result
        #[arg(long, default_value_t = 1)]
        option: usize,

        #[arg(long, default_value_t = 0.0)]
        amount: f64,

        #[arg(long, default_value = "servings")]
        unit: String,

        #[arg(long, value_enum)]
        meal: Option<Meal>,

        /// Results to show
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Recent search terms
    History {
        #[arg(long)]
        clear: bool,
    },

    /// Look up a barcode on Open Food Facts and log one serving
    Barcode {
        code: String,

        #[arg(long, default_value_t = 100.0)]
        grams: f64,

        #[arg(long, value_enum)]
        meal: Option<Meal>,
    },

    /// Convert an amount between units
    Convert {
        amount: f64,
        unit: String,

        /// Target unit; all common units when omitted
        #[arg(long)]
        to: Option<String>,
    },

    /// Export tracker data
    Export {
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Defaults to calorie-counter-YYYY-MM-DD.json (or .csv)
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Replace tracker data with an exported file
    Import {
        #[arg(value_name = "FILE")]
        file: String,
    },
}

#[derive(Subcommand)]
pub enum DayCommand {
    /// List all days
    List,
    /// Start a new empty day
    New,
    /// Copy the active day into a new day
    Copy,
    /// Clear foods, notes, water and burned calories
    Clear,
    /// Delete the active day
    Delete,
    /// Switch to another day (1-based)
    Switch { index: usize },
    /// Set the day notes
    Notes { text: String },
    /// Set calories burned
    Burned { calories: f64 },
    /// Set a label shown instead of the date
    Label { text: String },
    /// Set the date (YYYY-MM-DD)
    Date { date: String },
    /// Override one goal for this day (0 removes it)
    Override { field: GoalField, value: f64 },
    /// Copy the global goals into this day's overrides
    EnableOverrides,
    /// Remove every override of this day
    ClearOverrides,
}

#[derive(Subcommand)]
pub enum FoodCommand {
    /// Add a custom food
    Add {
        name: String,
        #[command(flatten)]
        macros: MacroArgs,
        #[arg(long, default_value = "")]
        brand: String,
        #[arg(long, default_value_t = 0.0)]
        serving_size: f64,
        #[arg(long, default_value = "")]
        serving_unit: String,
        /// Amount eaten; 0 means one serving
        #[arg(long, default_value_t = 0.0)]
        amount: f64,
        /// servings, g, oz, cup, ...
        #[arg(long, default_value = "servings")]
        unit: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, value_enum)]
        meal: Option<Meal>,
    },
    /// Log calories only
    Quick {
        calories: f64,
        #[arg(long, default_value = "")]
        label: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, value_enum)]
        meal: Option<Meal>,
    },
    /// Edit a logged food
    Edit {
        /// Position or id prefix
        selector: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long, value_enum)]
        meal: Option<Meal>,
        #[arg(long)]
        serving_size: Option<f64>,
        #[arg(long)]
        serving_unit: Option<String>,
        #[arg(long)]
        calories: Option<f64>,
        #[arg(long)]
        protein: Option<f64>,
        #[arg(long)]
        fat: Option<f64>,
        #[arg(long)]
        carbs: Option<f64>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove a logged food (can be undone)
    Remove { selector: String },
    /// Put back the last removed food
    Undo,
    /// Log a copy of a food
    Duplicate { selector: String },
    /// List foods of the active day
    List {
        #[arg(long, value_enum)]
        meal: Option<Meal>,
        #[arg(long, value_enum)]
        source: Option<FoodSource>,
        #[arg(long, value_enum, default_value = "created-at")]
        sort: SortKey,
        #[arg(long, value_enum, default_value = "desc")]
        dir: SortDir,
    },
}

#[derive(Subcommand)]
pub enum GoalsCommand {
    Show,
    /// Set one goal; water is taken in the preferred water unit
    Set { field: GoalField, value: f64 },
    /// Derive macro goals from the calorie goal
    Preset {
        #[arg(value_enum)]
        preset: MacroPreset,
    },
    /// Use the saved TDEE as the calorie goal
    ApplyTdee,
}

#[derive(Args)]
pub struct TdeeArgs {
    #[arg(long, value_enum, default_value = "mifflin")]
    pub formula: Formula,
    #[arg(long, value_enum)]
    pub sex: Option<Sex>,
    #[arg(long, default_value_t = 0.0)]
    pub age: f64,
    #[arg(long)]
    pub weight: f64,
    #[arg(long, value_enum, default_value = "kg")]
    pub weight_unit: WeightUnit,
    #[arg(long, default_value_t = 0.0)]
    pub height: f64,
    #[arg(long, value_enum, default_value = "cm")]
    pub height_unit: HeightUnit,
    #[arg(long, default_value_t = 0.0)]
    pub body_fat: f64,
    #[arg(long, value_enum, default_value = "sedentary")]
    pub activity: ActivityLevel,
    /// Remember the result for `goals apply-tdee`
    #[arg(long)]
    pub save: bool,
}

#[derive(Subcommand)]
pub enum FavoriteCommand {
    List,
    /// Add or remove a logged food of the active day
    Toggle { selector: String },
    Remove { selector: String },
    /// Log a favorite to the active day
    Log {
        selector: String,
        #[arg(long, default_value_t = 1.0)]
        servings: f64,
        #[arg(long, value_enum)]
        meal: Option<Meal>,
    },
}

#[derive(Subcommand)]
pub enum RecipeCommand {
    List,
    Show {
        selector: String,
    },
    Add {
        name: String,
        #[command(flatten)]
        macros: MacroArgs,
        #[arg(long, default_value_t = 1.0)]
        servings: f64,
        /// Repeat for each ingredient line
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Remove {
        selector: String,
    },
    Duplicate {
        selector: String,
    },
    /// Log servings of a recipe to the active day
    Log {
        selector: String,
        #[arg(long)]
        servings: Option<f64>,
        #[arg(long, value_enum)]
        meal: Option<Meal>,
    },
}

#[derive(Subcommand)]
pub enum PlanCommand {
    List,
    Add {
        name: String,
        #[command(flatten)]
        macros: MacroArgs,
        /// YYYY-MM-DD, today when omitted
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long, value_enum)]
        meal: Option<Meal>,
        #[arg(long, default_value_t = 1.0)]
        servings: f64,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Remove {
        selector: String,
    },
    /// Remove every item planned for a date
    ClearDate {
        date: String,
    },
    /// Log a date's plan into the active day
    Apply {
        date: String,
    },
}

#[derive(Subcommand)]
pub enum MeasureCommand {
    List,
    Add {
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        body_fat: Option<f64>,
        #[arg(long)]
        waist: Option<f64>,
        #[arg(long)]
        hips: Option<f64>,
        #[arg(long)]
        chest: Option<f64>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Remove {
        selector: String,
    },
}

#[derive(Subcommand)]
pub enum WorkoutCommand {
    List,
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        date: String,
        /// Minutes
        #[arg(long, default_value_t = 0.0)]
        duration: f64,
        #[arg(long, default_value_t = 0.0)]
        calories: f64,
        /// name:sets:reps:weight, repeatable
        #[arg(long = "exercise")]
        exercises: Vec<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Remove {
        selector: String,
    },
}

// ---------------------------------------------------------------
// study
// ---------------------------------------------------------------

#[derive(Subcommand)]
pub enum StudyCommand {
    /// Manage decks
    #[command(subcommand)]
    Deck(DeckCommand),

    /// Manage cards of the current deck
    #[command(subcommand)]
    Card(CardCommand),

    /// Flip through the current deck
    Review {
        #[arg(long)]
        shuffle: bool,
    },

    /// Take a scored test on the current deck
    Test {
        #[arg(long)]
        shuffle: bool,

        /// Seconds allowed per question
        #[arg(long, conflicts_with = "total")]
        per_question: Option<u64>,

        /// Minutes allowed for the whole test
        #[arg(long)]
        total: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum DeckCommand {
    List,
    Create { name: String },
    /// Rename the current deck
    Rename { name: String },
    /// Delete a deck (the current one by default)
    Delete { name: Option<String> },
    Switch { name: String },
    /// Write a deck as a JSON array
    Export {
        #[arg(long)]
        name: Option<String>,
        /// Prints to stdout when omitted
        #[arg(long, value_name = "FILE")]
        file: Option<String>,
    },
    /// Load a JSON array of cards as a deck
    Import {
        #[arg(value_name = "FILE")]
        file: String,
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CardCommand {
    List {
        /// Filter on front or back text
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a card; give --choice at least twice for multiple choice
    Add {
        front: String,
        back: String,
        #[arg(long = "choice")]
        choices: Vec<String>,
    },
    Edit {
        selector: String,
        front: String,
        back: String,
        #[arg(long = "choice")]
        choices: Vec<String>,
    },
    Delete {
        selector: String,
    },
    /// Remove every card of the current deck
    Clear,
}
