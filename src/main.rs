use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colseg::engine::core::read::{ReaderOptions, RowBatch, SegmentReader};
use colseg::engine::core::segment::SegmentFileLoader;
use colseg::engine::schema::SchemaFile;
use colseg::engine::types::ColumnId;
use colseg::logging;
use colseg::shared::config::CONFIG;
use tracing::info;

#[derive(Parser)]
#[command(name = "colseg")]
#[command(about = "Inspect and scan columnar segment files", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the segment header and stream layout
    Inspect { file: PathBuf },

    /// Read every block of a segment and report row counts and block states
    Scan {
        file: PathBuf,

        /// TOML file with one [[columns]] table per schema column
        #[arg(long)]
        schema: PathBuf,

        /// Rows per batch (defaults to the segment's rows per block)
        #[arg(long)]
        batch_rows: Option<usize>,

        /// Do not insert index streams into the shared cache
        #[arg(long)]
        no_cache: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init()?;

    match args.command {
        Command::Inspect { file } => inspect(file),
        Command::Scan {
            file,
            schema,
            batch_rows,
            no_cache,
        } => scan(file, schema, batch_rows, !no_cache),
    }
}

fn inspect(file: PathBuf) -> anyhow::Result<()> {
    let segment = SegmentFileLoader::new(CONFIG.reader.max_supported_version)
        .open(&file)
        .with_context(|| format!("opening {}", file.display()))?;
    let header = &segment.header;

    println!("file:               {}", file.display());
    println!("version:            {}", header.version);
    println!("compression:        {:?}", header.compress_kind);
    println!("null_supported:     {}", header.null_supported);
    println!("stream_buffer_size: {}", header.stream_buffer_size);
    println!("rows_per_block:     {}", header.num_rows_per_block);
    println!("number_of_rows:     {}", header.number_of_rows);
    println!(
        "bloom filter:       {} bits, {} hash functions",
        header.bf_bit_num, header.bf_hash_function_num
    );
    println!("header_length:      {}", segment.header_length);
    println!();
    println!("columns:");
    for (segment_id, column) in header.columns.iter().enumerate() {
        println!(
            "  #{segment_id:<3} unique_id={:<6} encoding={:?}",
            column.unique_id, column.encoding
        );
    }
    println!();
    println!("streams:");
    for span in &segment.streams {
        println!(
            "  column={:<6} {:<12} offset={:<10} length={}",
            span.descriptor.column_unique_id,
            format!("{:?}", span.descriptor.kind),
            span.offset,
            span.descriptor.length
        );
    }
    Ok(())
}

fn scan(
    file: PathBuf,
    schema_path: PathBuf,
    batch_rows: Option<usize>,
    use_cache: bool,
) -> anyhow::Result<()> {
    let text = fs::read_to_string(&schema_path)
        .with_context(|| format!("reading schema {}", schema_path.display()))?;
    let schema = Arc::new(
        SchemaFile::parse(&text)
            .with_context(|| format!("parsing schema {}", schema_path.display()))?
            .into_schema(),
    );
    let columns: Vec<ColumnId> = (0..schema.num_columns() as ColumnId).collect();

    let options = ReaderOptions::new(columns.clone()).with_global_cache();
    let mut reader = SegmentReader::new(&file, Arc::clone(&schema), options);
    reader
        .init(use_cache)
        .with_context(|| format!("opening {}", file.display()))?;

    let rows_per_block = reader.rows_per_block().unwrap_or(1) as usize;
    let mut batch = RowBatch::new(columns, batch_rows.unwrap_or(rows_per_block));
    let last_block = reader.block_count().saturating_sub(1);
    let mut position = reader.seek_to_block(0, last_block, false)?;

    let mut total_rows = 0usize;
    while !position.eof {
        let block = position.next_block_id;
        position = reader.get_block(&mut batch)?;
        if batch.size() > 0 {
            total_rows += batch.size();
            println!(
                "block {block:<6} rows={:<6} state={:?}",
                batch.size(),
                batch.block_state()
            );
        }
    }

    let stats = reader.stats();
    println!();
    println!("rows read:           {total_rows}");
    println!("blocks loaded:       {}", stats.blocks_load);
    println!("rows skipped:        {}", stats.rows_batch_truncated);
    println!("index streams read:  {}", stats.index_stream_reads);
    println!("index cache hits:    {}", stats.index_cache_hits);
    println!("bytes read:          {}", stats.bytes_read);
    info!(
        target: "colseg::cli",
        file = %file.display(),
        total_rows,
        file_reads = reader.file_reads(),
        "Scan finished"
    );
    Ok(())
}
