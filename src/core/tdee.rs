//! Energy expenditure estimates.
//!
//! `calculate` picks a BMR equation, then multiplies by the activity level.
//! Inputs are validated first so that every missing field gets its own message.

use crate::errors::{AppError, AppResult};
use clap::ValueEnum;

const LB_TO_KG: f64 = 0.453592;
const IN_TO_CM: f64 = 2.54;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Formula {
    Mifflin,
    Harris,
    Revised,
    Katch,
    Cunningham,
    Owen,
    Schofield,
    Who,
}

impl Formula {
    pub fn label(&self) -> &'static str {
        match self {
            Formula::Mifflin => "Mifflin-St Jeor",
            Formula::Harris => "Harris-Benedict (1919)",
            Formula::Revised => "Revised Harris-Benedict (1984)",
            Formula::Katch => "Katch-McArdle",
            Formula::Cunningham => "Cunningham",
            Formula::Owen => "Owen",
            Formula::Schofield => "Schofield (18-30)",
            Formula::Who => "WHO",
        }
    }

    fn needs_sex(&self) -> bool {
        !self.needs_body_fat()
    }

    fn needs_age(&self) -> bool {
        matches!(
            self,
            Formula::Mifflin | Formula::Harris | Formula::Revised | Formula::Schofield
        )
    }

    fn needs_height(&self) -> bool {
        matches!(self, Formula::Mifflin | Formula::Harris | Formula::Revised)
    }

    fn needs_body_fat(&self) -> bool {
        matches!(self, Formula::Katch | Formula::Cunningham)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HeightUnit {
    #[default]
    Cm,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    VeryActive,
    Extreme,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::Extreme => 1.9,
        }
    }
}

/// Raw form values, in the units the user typed them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdeeInput {
    pub formula: Formula,
    pub sex: Option<Sex>,
    pub age: f64,
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub height: f64,
    pub height_unit: HeightUnit,
    pub body_fat: f64,
    pub activity: ActivityLevel,
}

/// Metric values ready for the equations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub formula: Formula,
    pub sex: Sex,
    pub age: f64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub body_fat: f64,
    pub activity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub bmr: f64,
    pub tdee: f64,
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl TdeeInput {
    /// Check the inputs the chosen formula needs and convert them to kg/cm.
    pub fn validate(&self) -> AppResult<Profile> {
        let f = self.formula;
        if !positive(self.weight) {
            return Err(AppError::invalid("Enter a valid weight."));
        }
        if f.needs_height() && !positive(self.height) {
            return Err(AppError::invalid("Enter a valid height."));
        }
        if f.needs_age() && !positive(self.age) {
            return Err(AppError::invalid("Enter a valid age."));
        }
        if f.needs_body_fat() && !positive(self.body_fat) {
            return Err(AppError::invalid("Enter a valid body fat %."));
        }
        if f == Formula::Schofield && !(18.0..=30.0).contains(&self.age) {
            return Err(AppError::invalid(
                "Schofield formula here is set for ages 18-30.",
            ));
        }
        if f.needs_sex() && self.sex.is_none() {
            return Err(AppError::invalid("Select a sex."));
        }

        let weight_kg = match self.weight_unit {
            WeightUnit::Kg => self.weight,
            WeightUnit::Lb => self.weight * LB_TO_KG,
        };
        let height_cm = match self.height_unit {
            HeightUnit::Cm => self.height,
            HeightUnit::In => self.height * IN_TO_CM,
        };

        Ok(Profile {
            formula: f,
            // Lean-mass formulas ignore sex entirely.
            sex: self.sex.unwrap_or(Sex::Female),
            age: self.age,
            weight_kg,
            height_cm,
            body_fat: if f.needs_body_fat() { self.body_fat } else { 0.0 },
            activity: self.activity.multiplier(),
        })
    }
}

/// BMR for a profile, `None` when the result is not a positive number.
pub fn bmr(p: &Profile) -> Option<f64> {
    let w = p.weight_kg;
    let h = p.height_cm;
    let a = p.age;
    let male = p.sex == Sex::Male;
    let lean_mass = w * (1.0 - p.body_fat / 100.0);

    let value = match p.formula {
        Formula::Mifflin => 10.0 * w + 6.25 * h - 5.0 * a + if male { 5.0 } else { -161.0 },
        Formula::Harris if male => 66.5 + 13.75 * w + 5.003 * h - 6.755 * a,
        Formula::Harris => 655.1 + 9.563 * w + 1.85 * h - 4.676 * a,
        Formula::Revised if male => 88.362 + 13.397 * w + 4.799 * h - 5.677 * a,
        Formula::Revised => 447.593 + 9.247 * w + 3.098 * h - 4.33 * a,
        Formula::Katch => 370.0 + 21.6 * lean_mass,
        Formula::Cunningham => 500.0 + 22.0 * lean_mass,
        Formula::Owen if male => 879.0 + 10.2 * w,
        Formula::Owen => 795.0 + 7.18 * w,
        Formula::Schofield if male => 15.057 * w + 692.2,
        Formula::Schofield => 14.818 * w + 486.6,
        Formula::Who if male => (0.063 * w + 2.896) * 239.0,
        Formula::Who => (0.062 * w + 2.036) * 239.0,
    };

    (value.is_finite() && value > 0.0).then_some(value)
}

/// BMR × activity. An activity of 0 counts as 1.
pub fn calculate(p: &Profile) -> Option<Estimate> {
    let bmr = bmr(p)?;
    let activity = if p.activity == 0.0 { 1.0 } else { p.activity };
    let tdee = bmr * activity;
    tdee.is_finite().then_some(Estimate { bmr, tdee })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(formula: Formula) -> TdeeInput {
        TdeeInput {
            formula,
            sex: Some(Sex::Male),
            age: 30.0,
            weight: 80.0,
            weight_unit: WeightUnit::Kg,
            height: 180.0,
            height_unit: HeightUnit::Cm,
            body_fat: 20.0,
            activity: ActivityLevel::Sedentary,
        }
    }

    #[test]
    fn mifflin_reference_value() {
        let est = calculate(&input(Formula::Mifflin).validate().unwrap()).unwrap();
        assert!((est.bmr - 1780.0).abs() < 1e-9);
        assert!((est.tdee - 2136.0).abs() < 1e-9);
    }

    #[test]
    fn lean_mass_formulas_skip_sex() {
        let mut i = input(Formula::Katch);
        i.sex = None;
        let est = calculate(&i.validate().unwrap()).unwrap();
        // 80 kg at 20 % fat → 64 kg lean mass
        assert!((est.bmr - (370.0 + 21.6 * 64.0)).abs() < 1e-9);
    }

    #[test]
    fn imperial_inputs_convert() {
        let mut i = input(Formula::Owen);
        i.weight = 100.0;
        i.weight_unit = WeightUnit::Lb;
        let p = i.validate().unwrap();
        assert!((p.weight_kg - 45.3592).abs() < 1e-9);

        let mut i = input(Formula::Mifflin);
        i.height = 70.0;
        i.height_unit = HeightUnit::In;
        assert!((i.validate().unwrap().height_cm - 177.8).abs() < 1e-9);
    }

    #[test]
    fn missing_inputs_are_reported() {
        let mut i = input(Formula::Harris);
        i.height = 0.0;
        let err = i.validate().unwrap_err().to_string();
        assert_eq!(err, "Enter a valid height.");

        let mut i = input(Formula::Schofield);
        i.age = 45.0;
        assert!(i.validate().is_err());

        let mut i = input(Formula::Who);
        i.sex = None;
        assert_eq!(i.validate().unwrap_err().to_string(), "Select a sex.");

        let mut i = input(Formula::Cunningham);
        i.body_fat = 0.0;
        assert!(i.validate().is_err());
    }

    #[test]
    fn non_positive_results_are_rejected() {
        let p = Profile {
            formula: Formula::Mifflin,
            sex: Sex::Female,
            age: 500.0,
            weight_kg: 1.0,
            height_cm: 1.0,
            body_fat: 0.0,
            activity: 1.2,
        };
        assert!(calculate(&p).is_none());

        let mut p = input(Formula::Who).validate().unwrap();
        p.activity = 0.0;
        let est = calculate(&p).unwrap();
        assert_eq!(est.bmr, est.tdee);
    }
}
