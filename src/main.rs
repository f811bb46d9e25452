use anyhow::Result;
use std::env;

use friend_ledger::{logging, Config, FriendId, FriendLedgerStore, Payer, SequentialIds};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = Config::from_env()?;

    if args.len() > 1 && args[1] == "demo" {
        // Scripted walkthrough, no terminal UI
        logging::init_stderr(&config.log_filter)?;
        run_demo()?;
    } else {
        // UI mode (default)
        run_ui_mode(&config)?;
    }

    Ok(())
}

fn print_friends(store: &FriendLedgerStore) {
    for friend in store.state().friends() {
        println!("   {:<10} {}", friend.name(), friend.balance_label());
    }
}

fn run_demo() -> Result<()> {
    println!("🍽️  Split the bill - demo");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut store = FriendLedgerStore::new();
    let mut ids = SequentialIds::new("D");

    println!("\n👥 Starting balances:");
    print_friends(&store);

    // 1. You pay a $100 bill with Clark, your share is $40
    println!("\n🧾 You paid $100 with Clark (your expense $40)...");
    store.select_friend(&FriendId::from("118836"))?;
    store.split_bill(Payer::User, 100.0, 40.0)?;
    print_friends(&store);

    // 2. Sarah pays a $50 bill, your share is $20
    println!("\n🧾 Sarah paid $50 (your expense $20)...");
    store.select_friend(&FriendId::from("933372"))?;
    store.split_bill(Payer::Friend, 50.0, 20.0)?;
    print_friends(&store);

    // 3. Add a friend
    println!("\n➕ Adding Dana...");
    store.toggle_add_panel();
    store.add_friend("Dana", "https://i.pravatar.cc/48?u=dana", &mut ids)?;
    print_friends(&store);

    // 4. Splitting with nobody selected is refused
    println!("\n🚫 Splitting with nobody selected...");
    match store.split_bill(Payer::User, 10.0, 5.0) {
        Ok(_) => println!("   unexpectedly accepted"),
        Err(e) => println!("   refused: {}", e),
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📜 History:");
    for event in store.history() {
        println!("   {:>2}. {}", event.sequence, event.describe());
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    use friend_ledger::ui;

    let _guard = logging::init_file(&config.log_dir, &config.log_filter)?;

    let mut app = ui::App::new(config.new_store());
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or try: cargo run -- demo");
    std::process::exit(1);
}
