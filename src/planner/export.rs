//! CSV export of the scheduled itinerary

use super::board::ItineraryBoard;

const HEADER: [&str; 7] = ["day", "date", "position", "time", "title", "destination", "notes"];

fn field(raw: &str) -> String {
    if raw.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

impl ItineraryBoard {
    /// One row per scheduled item, in day then position order. Docked items
    /// are not part of the itinerary and are left out.
    pub fn to_csv(&self) -> String {
        let mut out = HEADER.join(",");
        out.push('\n');
        for day in self.days() {
            let date = day.date.map(|d| d.to_string()).unwrap_or_default();
            for (position, item) in day.items.iter().enumerate() {
                let row = [
                    (day.index + 1).to_string(),
                    date.clone(),
                    (position + 1).to_string(),
                    item.start_time.clone().unwrap_or_default(),
                    item.title.clone(),
                    item.destination_slug.clone().unwrap_or_default(),
                    item.notes.clone().unwrap_or_default(),
                ];
                let cells: Vec<String> = row.iter().map(|cell| field(cell)).collect();
                out.push_str(&cells.join(","));
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::planner::{ItineraryBoard, ItineraryItem};
    use time::macros::date;

    #[test]
    fn test_csv_quotes_and_skips_dock() {
        let mut board = ItineraryBoard::new("trip", Some(date!(2024 - 05 - 06)), None).unwrap();
        board
            .add_to_dock(
                ItineraryItem::new("Lunch, \"the good one\"")
                    .with_id("a")
                    .at_time("12:30")
                    .at_destination("lisbon"),
            )
            .unwrap();
        board.add_to_dock(ItineraryItem::new("Maybe").with_id("b")).unwrap();
        board.schedule("a", 0, 0).unwrap();

        let csv = board.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "day,date,position,time,title,destination,notes");
        assert_eq!(
            lines[1],
            "1,2024-05-06,1,12:30,\"Lunch, \"\"the good one\"\"\",lisbon,"
        );
        assert_eq!(lines.len(), 2);
    }
}
