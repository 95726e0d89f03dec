use tahfiz_core::achievements::CATALOG;

pub fn run(all: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = super::open_session()?;
    let unlocked = session.store().unlocked_achievements();

    for rule in CATALOG {
        match unlocked.get(rule.id) {
            Some(at) => {
                println!("[x] {} -- {} ({})", rule.name, rule.description, at.format("%Y-%m-%d"));
            }
            None if all => {
                println!("[ ] {} -- {}", rule.name, rule.description);
            }
            None => {}
        }
    }

    if unlocked.is_empty() && !all {
        println!("no achievements yet; run with --all to see what's ahead");
    }
    Ok(())
}
