use chrono::Utc;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let session = super::open_session()?;
    let store = session.store();
    let streak = store.streak();
    let goal = store.goal_for(Utc::now());

    println!(
        "streak: {} (longest {})",
        streak.current, streak.longest
    );
    match streak.last_active_day {
        Some(day) => println!("last active: {day}"),
        None => println!("last active: never"),
    }
    println!(
        "today: {}/{} new, {}/{} review{}",
        goal.completed_new,
        goal.target_new,
        goal.completed_review,
        goal.target_review,
        if goal.is_met() { " -- goal met" } else { "" },
    );
    Ok(())
}
