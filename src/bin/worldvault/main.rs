use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::error;

mod cli;
mod util;
mod cmd_worlds;
mod cmd_backup;
mod cmd_list;
mod cmd_restore;
mod cmd_menu;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт info.
    // Пример: RUST_LOG=debug worldvault list
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:#}", e);
        // Ошибка авторизации хранилища: отдельный код выхода.
        let code = if util::is_fatal(&e) { 2 } else { 1 };
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    let cfg = util::load_config(&cli.global);
    log::debug!("config: {}", cfg);

    let res = match cli.cmd.unwrap_or(cli::Cmd::Menu) {
        cli::Cmd::Worlds { json } =>
            cmd_worlds::exec(&cfg, json),

        cli::Cmd::Backup { world, json } =>
            cmd_backup::exec(&cfg, &world, json),

        cli::Cmd::List { json } =>
            cmd_list::exec(&cfg, json),

        cli::Cmd::Restore { select, name, yes, json } =>
            cmd_restore::exec(&cfg, select, name, yes, json),

        cli::Cmd::Menu =>
            cmd_menu::exec(&cfg),
    };

    if cli.global.metrics {
        util::print_metrics();
    }
    res
}
