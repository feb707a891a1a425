use tickstore::{Tick, TickReader, TickWriter};

fn main() -> Result<(), tickstore::Error> {
    env_logger::init();

    println!("Tick Storage");
    println!("============\n");

    let base = 1_700_000_000_000u64;
    let mut writer = TickWriter::new();

    for i in 0..100_000u64 {
        let drift = ((i as f64 / 500.0).sin() * 2500.0) as i64;
        let price = (1_500_000 + drift + (i % 7) as i64) as u32;
        writer.add_tick(Tick {
            unixtime: base + i * 137,
            volume: 100 * (1 + (i % 5) as u32),
            price,
            bid: price - 100,
            ask: price + 100,
            bid_size: 1000 + (i % 13) as u32 * 100,
            ask_size: 1200 + (i % 11) as u32 * 100,
            is_market: i % 3 != 0,
        });
    }

    let raw_size = writer.len() * tickstore::RecordLayout::V2_SIZE;
    println!("Original data:");
    println!("  Ticks: {}", writer.len());
    println!("  Raw size: {} bytes\n", raw_size);

    let path = std::env::temp_dir().join("tickstore-demo/DEMO/20231114.ticks");

    let start = std::time::Instant::now();
    writer.save(&path)?;
    let save_time = start.elapsed();

    let file_size = std::fs::metadata(&path)?.len();
    println!("Saved to {}:", path.display());
    println!("  File size: {} bytes", file_size);
    println!(
        "  Compression ratio: {:.2}%",
        (1.0 - file_size as f64 / raw_size as f64) * 100.0
    );
    println!("  Save time: {:?}\n", save_time);

    let start = std::time::Instant::now();
    let mut reader = TickReader::new(&path);
    reader.load()?;
    let load_time = start.elapsed();

    let mut total_volume = 0u64;
    let mut market_ticks = 0usize;
    while let Some(tick) = reader.next_tick()? {
        if tick.is_market {
            total_volume += tick.volume as u64;
            market_ticks += 1;
        }
    }

    println!("Loaded:");
    println!("  Ticks: {}", reader.len());
    println!("  Market ticks: {}", market_ticks);
    println!("  Market volume: {}", total_volume);
    println!("  Load time: {:?}", load_time);

    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
    Ok(())
}
