use ghostcursor_bridge::{settings, shell, util};

fn main() -> anyhow::Result<()> {
    util::init_tracing();
    util::install_panic_hook();

    let args = settings::parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{}", settings::USAGE);
        return Ok(());
    }

    let path = settings::resolve_settings_path(&args)?;
    tracing::info!(path = %path.display(), "settings file");
    shell::run(path)
}
