#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]

use bidtable::{Bid, ChainedHashTable, TableExtensions};
use plotters::prelude::*;
use rand::Rng;

// Bids inserted into every table
const NUM_BIDS: usize = 20_000;

// Bucket counts to compare, primes mixed with round and power-of-two sizes
const TABLE_SIZES: [usize; 10] = [64, 100, 128, 179, 250, 256, 500, 512, 1000, 1024];

// Sequential auction ids are often issued with a fixed step
const ID_STRIDE: u64 = 10;
const FIRST_ID: u64 = 10_000;

const DISTRIBUTIONS: [&str; 2] = ["Uniform random ids", "Sequential ids, stride 10"];

#[derive(Debug, Clone, Copy)]
struct ChainStats {
    /// Records per non-empty bucket
    mean_chain: f64,
    /// Records in the fullest bucket
    longest_chain: usize,
    /// Buckets holding at least one record
    occupied: usize,
}

// Fills a table of `size` buckets and measures how the ids spread over it
fn measure(size: usize, ids: &[u64]) -> Result<ChainStats, bidtable::Error> {
    let mut table = ChainedHashTable::with_size(size)?;
    for id in ids {
        table.insert(Bid::new(id.to_string(), "generated", "Simulation", 0.0))?;
    }

    let occupied = table.occupied_buckets();
    Ok(ChainStats {
        mean_chain: table.len() as f64 / occupied.max(1) as f64,
        longest_chain: table.longest_chain(),
        occupied,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rng();
    let uniform: Vec<u64> = (0..NUM_BIDS).map(|_| rng.random_range(FIRST_ID..1_000_000)).collect();
    let sequential: Vec<u64> = (0..NUM_BIDS as u64).map(|i| FIRST_ID + i * ID_STRIDE).collect();
    let id_sets = [uniform, sequential];

    // results[distribution][size index]
    let mut results: Vec<Vec<ChainStats>> = vec![Vec::new(); DISTRIBUTIONS.len()];

    for &size in &TABLE_SIZES {
        println!("Table with {size} buckets");
        for ((name, ids), stats) in DISTRIBUTIONS.iter().zip(&id_sets).zip(results.iter_mut()) {
            let measured = measure(size, ids)?;
            println!(
                "  {name}: mean chain = {:.2}, longest = {}, occupied = {}/{size}",
                measured.mean_chain, measured.longest_chain, measured.occupied
            );
            stats.push(measured);
        }
    }

    let font_family = "sans-serif";
    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];
    let line_width = 2;
    let marker_size = 4;
    let text_size = 16;
    let title_size = 30;

    let root = BitMapBackend::new("chain_lengths.png", (1200, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((2, 1));

    let metrics: [(&str, &str, fn(&ChainStats) -> f64); 2] = [
        ("Mean Chain Length per Occupied Bucket", "Records per bucket", |s| s.mean_chain),
        ("Longest Chain", "Records in fullest bucket", |s| s.longest_chain as f64),
    ];

    let x_labels: Vec<String> = TABLE_SIZES.iter().map(ToString::to_string).collect();

    for (area, (caption, y_desc, metric)) in areas.iter().zip(metrics) {
        let max_y = results
            .iter()
            .flat_map(|stats| stats.iter().map(metric))
            .fold(0.0, f64::max) *
            1.1; // Add 10% margin

        let mut chart = ChartBuilder::on(area)
            .caption(caption, (font_family, title_size))
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(0..TABLE_SIZES.len(), 0.0..max_y.max(1.0))?;

        chart
            .configure_mesh()
            .x_labels(TABLE_SIZES.len())
            .x_label_formatter(&|x| x_labels.get(*x).cloned().unwrap_or_default())
            .x_desc("Number of Buckets")
            .y_desc(y_desc)
            .axis_desc_style((font_family, text_size))
            .draw()?;

        for ((name, stats), color) in DISTRIBUTIONS.iter().zip(&results).zip(&colors) {
            let line_style = ShapeStyle::from(color).stroke_width(line_width);

            chart
                .draw_series(LineSeries::new(
                    stats.iter().enumerate().map(|(i, s)| (i, metric(s))),
                    line_style,
                ))?
                .label(*name)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

            chart.draw_series(
                stats
                    .iter()
                    .enumerate()
                    .map(|(i, s)| Circle::new((i, metric(s)), marker_size, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    root.present()?;
    println!("Generated plot image: chain_lengths.png");

    Ok(())
}
