use btc_fingerprint::{cli, utils};

fn main() {
    utils::init_logging();
    cli::run();
}
