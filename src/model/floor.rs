use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableStatus {
    Free,
    Occupied,
    Visited,
    Waiting,
}

impl TableStatus {
    pub fn is_seated(self) -> bool {
        !matches!(self, TableStatus::Free)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    id: TableId,
    /// floor coordinates, [0.0, 100.0] from the top-left corner
    x: f64,
    y: f64,
    status: TableStatus,
    wait_minutes: Option<u32>,
    guests: u32,
}

impl Table {
    pub fn new(
        id: TableId,
        x: f64,
        y: f64,
        status: TableStatus,
        wait_minutes: Option<u32>,
        guests: u32,
    ) -> Self {
        Self {
            id,
            x,
            y,
            status,
            wait_minutes,
            guests,
        }
    }

    pub fn free(id: TableId, x: f64, y: f64) -> Self {
        Self::new(id, x, y, TableStatus::Free, None, 0)
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn status(&self) -> TableStatus {
        self.status
    }

    pub fn wait_minutes(&self) -> Option<u32> {
        self.wait_minutes
    }

    pub fn guests(&self) -> u32 {
        self.guests
    }

    pub fn set_status(&mut self, status: TableStatus) {
        self.status = status;
    }

    pub fn set_wait_minutes(&mut self, wait_minutes: Option<u32>) {
        self.wait_minutes = wait_minutes;
    }

    pub fn set_guests(&mut self, guests: u32) {
        self.guests = guests;
    }
}

/// The dining room as last reported by the tracking system.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Floor {
    tables: Vec<Table>,
}

impl Floor {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut [Table] {
        &mut self.tables
    }

    pub fn table_by_id(&self, id: TableId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id() == id)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn seated_count(&self) -> usize {
        self.tables.iter().filter(|t| t.status().is_seated()).count()
    }

    pub fn guest_count(&self) -> u32 {
        self.tables
            .iter()
            .filter(|t| t.status().is_seated())
            .map(|t| t.guests())
            .sum()
    }

    /// Mean wait over seated tables that report one, 0.0 when none do.
    pub fn avg_wait_minutes(&self) -> f64 {
        let waits = self
            .tables
            .iter()
            .filter(|t| t.status().is_seated())
            .filter_map(|t| t.wait_minutes())
            .collect::<Vec<u32>>();
        if waits.is_empty() {
            0.0
        } else {
            waits.iter().sum::<u32>() as f64 / waits.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor() -> Floor {
        Floor::new(vec![
            Table::new(TableId(1), 10.0, 10.0, TableStatus::Visited, Some(0), 4),
            Table::new(TableId(2), 10.0, 40.0, TableStatus::Waiting, Some(12), 2),
            Table::free(TableId(3), 10.0, 70.0),
            Table::new(TableId(4), 40.0, 10.0, TableStatus::Occupied, None, 3),
        ])
    }

    #[test]
    fn test_seated_and_guest_counts_skip_free_tables() {
        let floor = floor();

        assert_eq!(4, floor.table_count());
        assert_eq!(3, floor.seated_count());
        assert_eq!(9, floor.guest_count());
    }

    #[test]
    fn test_avg_wait_ignores_tables_without_a_reading() {
        assert_relative_eq!(6.0, floor().avg_wait_minutes());
        assert_relative_eq!(0.0, Floor::default().avg_wait_minutes());
    }
}
