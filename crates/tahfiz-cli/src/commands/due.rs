use chrono::Utc;
use tahfiz_core::quran;

pub fn run(limit: usize, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = super::open_session()?;
    let now = Utc::now();
    let due = session.store().query_due(now, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&due)?);
        return Ok(());
    }

    if due.is_empty() {
        println!("nothing due");
        return Ok(());
    }

    for card in due {
        let name = quran::surah_name(card.id.surah).unwrap_or("?");
        let overdue_days = (now - card.due_at).num_days();
        println!(
            "{:<16} {:<8} {:<9} overdue {}d",
            name,
            card.id.to_string(),
            card.status.label(),
            overdue_days.max(0),
        );
    }
    Ok(())
}
