use log::info;
use sift::todo::TodoList;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut todos = TodoList::sample();
    let added = todos.add("Buy lots of stuff with all the money we make from the app");
    println!("{}", serde_json::to_string(added)?);

    info!("{} todo items", todos.items().len());
    Ok(())
}
