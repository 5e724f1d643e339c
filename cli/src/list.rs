use chrono::{DateTime, Local};
use mapty_core::{ListRow, Workout};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

// Helper struct for Table Row
#[derive(Tabled)]
struct WorkoutRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Workout")]
    title: String,
    #[tabled(rename = "Details")]
    details: String,
    #[tabled(rename = "At")]
    at: String,
}

impl From<&Workout> for WorkoutRow {
    fn from(workout: &Workout) -> Self {
        let local_dt: DateTime<Local> = DateTime::from(workout.created_at());
        let row = ListRow::from(workout);
        Self {
            date: local_dt.format("%Y-%m-%d %H:%M").to_string(),
            id: short_id(workout.id()),
            title: row.title.clone(),
            details: row.detail_texts().join("  "),
            at: workout.coords().to_string(),
        }
    }
}

/// Last eight characters; v7 ids share their leading timestamp bits.
fn short_id(id: &str) -> String {
    let start = id.char_indices().rev().nth(7).map(|(i, _)| i).unwrap_or(0);
    id[start..].to_string()
}

pub fn show_workouts(workouts: &[Workout]) {
    if workouts.is_empty() {
        println!("No workouts found.");
        return;
    }

    // Newest first, like the sidebar.
    let rows: Vec<WorkoutRow> = workouts.iter().rev().map(WorkoutRow::from).collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color

    println!("{}", table);
}
