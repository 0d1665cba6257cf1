use crate::core::transfer::FoodRow;
use crate::errors::{AppError, AppResult};
use csv::Writer;
use std::path::Path;

/// Write one row per logged food, with a header line.
pub fn write_food_csv(path: &Path, rows: &[FoodRow]) -> AppResult<()> {
    let to_err = |e: csv::Error| AppError::Export(e.to_string());
    let mut wtr = Writer::from_path(path).map_err(to_err)?;

    if rows.is_empty() {
        wtr.write_record([
            "date", "label", "meal", "food", "brand", "servings", "serving", "calories",
            "protein", "fat", "carbs", "source", "notes",
        ])
        .map_err(to_err)?;
    }
    for row in rows {
        wtr.serialize(row).map_err(to_err)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn row(food: &str, calories: f64) -> FoodRow {
        FoodRow {
            date: "2026-10-18".into(),
            label: String::new(),
            meal: "Lunch".into(),
            food: food.into(),
            brand: String::new(),
            servings: 1.0,
            serving: "100 g".into(),
            calories,
            protein: 1.0,
            fat: 2.0,
            carbs: 3.0,
            source: "custom".into(),
            notes: "with, comma".into(),
        }
    }

    #[test]
    fn rows_are_written_with_header() {
        let path = std::env::temp_dir().join(format!("calstudy_csv_{}.csv", std::process::id()));
        write_food_csv(&path, &[row("Soup", 120.0)]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("date,label,meal,food"));
        assert_eq!(
            lines.next().unwrap(),
            "2026-10-18,,Lunch,Soup,,1.0,100 g,120.0,1.0,2.0,3.0,custom,\"with, comma\""
        );

        write_food_csv(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
        let _ = fs::remove_file(path);
    }
}
