use super::task::Task;
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Prints the task list in canonical order.
    pub fn tasks(tasks: &[Task]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "ID", "TITLE", "TIMER", "CREATED"]);
        for (rank, task) in tasks.iter().enumerate() {
            let timer = if task.timer_enabled {
                format!("{:02}:{:02}:{:02}", task.hours, task.minutes, task.seconds)
            } else {
                "—".to_string()
            };
            table.add_row(row![rank + 1, task.id, task.title, timer, task.created_at.format("%Y-%m-%d %H:%M")]);
        }
        table.printstd();

        Ok(())
    }
}
