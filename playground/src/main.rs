use clap::Parser;

use fbo_playground::logging::init_logging;

mod app;
mod args;

use app::App;
use args::ArgsPlayground;

fn main() {
    // clion needs help in trait annotation
    let args = <ArgsPlayground as Parser>::parse();

    init_logging(args.log.as_deref());

    let app = match App::new(&args) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    app.run();
}
