mod accounts;
mod commands;
mod models;
mod rclone;
mod runner;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    commands::run()
}
