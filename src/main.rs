// src/main.rs
use clap::Parser;
use ghostrider::miner::ghostrider::{
    INPUT_LEN, LaneCount, RotationId, derive_order, header_seed, max_scratch_bytes,
    resolve_rotation_or_default, tuning_row,
};
use ghostrider::miner::ghostrider::order::SEED_LEN;
use ghostrider::miner::ghostrider::rotation::ROTATION_COUNT;
use ghostrider::miner::ghostrider::tuning::PAGE_SIZE;
use ghostrider::miner::memory::SysfsHugePages;
use ghostrider::{Config, GhostRiderError, cli, config, utils};

/// Main entry point for the ghostrider binary
///
/// # Returns
/// - `Ok(())` on successful execution
/// - `Err(GhostRiderError)` if any operation fails
fn main() -> Result<(), GhostRiderError> {
    let cli = cli::Commands::parse();
    if cli.verbose {
        utils::init_verbose_logging();
    } else {
        utils::init_logging();
    }

    match cli.action {
        cli::Action::Order(opts) => show_order(opts),
        cli::Action::Tuning(opts) => show_tuning(opts),
        cli::Action::Hugepages(opts) => provision_huge_pages(opts),
        cli::Action::Config(opts) => generate_config(opts),
    }
}

/// Decodes a hex argument into a fixed-size array
fn decode_hex<const N: usize>(name: &str, value: &str) -> Result<[u8; N], GhostRiderError> {
    let bytes = hex::decode(value.trim())?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        GhostRiderError::InputError(format!("{} must be {} bytes, got {}", name, N, len))
    })
}

/// Prints the stage order, rotation and tuning rows for a header or block hash
///
/// # Arguments
/// * `opts` - The header or block hash to inspect
fn show_order(opts: cli::OrderOptions) -> Result<(), GhostRiderError> {
    let seed = match (opts.source.header, opts.source.block_hash) {
        (Some(header), _) => header_seed(&decode_hex::<INPUT_LEN>("header", &header)?),
        (None, Some(hash)) => decode_hex::<SEED_LEN>("block hash", &hash)?,
        (None, None) => {
            return Err(GhostRiderError::InputError(
                "either --header or --block-hash is required".into(),
            ));
        }
    };

    let order = derive_order(&seed);
    let rotation = resolve_rotation_or_default(&order);

    println!("seed:        {}", hex::encode(seed));
    println!("order:       {}", order);
    println!("rotation:    {}", rotation);
    println!("cn rotation: {}", rotation.cn_rotation());
    for lanes in LaneCount::ALL {
        println!("{}:       {}", lanes, tuning_row(lanes, rotation));
    }
    Ok(())
}

/// Prints every tuning row and the worst-case scratch size
///
/// # Arguments
/// * `opts` - Optional lane-count filter
fn show_tuning(opts: cli::TuningOptions) -> Result<(), GhostRiderError> {
    let lane_counts = match opts.lanes {
        Some(lanes) => vec![LaneCount::try_from(lanes as usize)?],
        None => LaneCount::ALL.to_vec(),
    };

    println!(
        "max scratch: {} KiB ({} pages)",
        max_scratch_bytes() / 1024,
        max_scratch_bytes() / PAGE_SIZE
    );
    for lanes in lane_counts {
        println!("\n{}", lanes);
        for rotation in (0..ROTATION_COUNT).filter_map(RotationId::new) {
            let triplet = rotation
                .triplet()
                .map(|algo| algo.to_string())
                .join(",");
            println!("{:>2} [{}] {}", rotation.index(), triplet, tuning_row(lanes, rotation));
        }
    }
    Ok(())
}

/// Provisions huge pages for the requested worker count
///
/// # Arguments
/// * `opts` - Optional config file, with thread count, pages per thread
///   and NUMA node overriding it
fn provision_huge_pages(opts: cli::HugePagesOptions) -> Result<(), GhostRiderError> {
    let config = match &opts.config {
        Some(path) => config::load(path)?,
        None => Config::default(),
    };
    let threads = opts.threads.unwrap_or(config.worker_threads);
    let node = opts.node.unwrap_or(config.numa_node);
    let pages = opts
        .pages_per_thread
        .unwrap_or_else(|| config.pages_per_thread());
    let pool = SysfsHugePages::new();

    if pool.provision_for_threads(threads, pages, node) {
        log::info!(
            "{} huge pages available for {} threads on node {}",
            threads * pages,
            threads,
            node
        );
    } else {
        log::warn!("Huge pages not provisioned; scratch will use standard pages");
    }
    Ok(())
}

/// Generates configuration template file
///
/// # Arguments
/// * `opts` - Configuration generation options
fn generate_config(opts: cli::ConfigOptions) -> Result<(), GhostRiderError> {
    let template = config::generate_template();
    std::fs::write(&opts.output, template)?;
    log::info!("Wrote configuration template to {}", opts.output.display());
    Ok(())
}
