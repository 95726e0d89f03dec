use chrono::Utc;
use tahfiz_core::{quran, Event, Quality, VerseId};
use uuid::Uuid;

pub fn run(surah: u16, ayah: u16, quality: u8, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let id = VerseId::new(surah, ayah);
    if !quran::is_valid(id) {
        return Err(format!("no such verse: {id}").into());
    }
    let quality = Quality::from_score(quality)?;

    let mut session = super::open_session()?;
    let now = Utc::now();
    let card = session
        .record_review_once(Uuid::new_v4(), id, quality, now)?
        .expect("fresh event id is never a duplicate");

    if json {
        println!("{}", serde_json::to_string_pretty(&card)?);
    } else {
        let name = quran::surah_name(surah).unwrap_or("?");
        println!(
            "{name} {id}: {} | interval {}d | due {} | reviews {}",
            card.status.label(),
            card.interval_days,
            card.due_at.format("%Y-%m-%d"),
            card.total_reviews,
        );
    }

    for event in session.drain_events() {
        match event {
            Event::StreakUpdated { current, celebrate: true, .. } => {
                println!("streak: {current} day{}", if current == 1 { "" } else { "s" });
            }
            Event::GoalCompleted { day, .. } => {
                println!("daily goal met for {day}");
            }
            Event::AchievementUnlocked { name, .. } => {
                println!("achievement unlocked: {name}");
            }
            _ => {}
        }
    }
    Ok(())
}
