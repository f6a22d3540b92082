use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use cadenza::common;
use cadenza::dictionary::{BuildParams, Dictionary, PointerBacking};

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    name = "compile",
    about = "A program to compile a completion dictionary."
)]
struct Args {
    /// Basename of the mapped collection (<basename>.mapped).
    #[clap(short = 'c', long)]
    collection_basename: String,

    /// Number of completions in the collection.
    #[clap(short = 'n', long)]
    num_completions: usize,

    /// Bucket parameter: completions grouped after each uncompressed
    /// header.
    #[clap(short = 'b', long, default_value_t = common::DEFAULT_BUCKET_SIZE)]
    bucket_size: usize,

    /// Pack the offset tables at a fixed bit width.
    #[clap(long)]
    compact_pointers: bool,

    /// File to which the binary dictionary is output.
    #[clap(short = 'o', long)]
    dict_out: PathBuf,

    /// File to which the doc-id sidecar is output.
    #[clap(short = 'd', long)]
    docs_out: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut params = BuildParams::new(args.collection_basename, args.num_completions);
    params.bucket_size = args.bucket_size;
    if args.compact_pointers {
        params.pointer_backing = PointerBacking::Compact;
    }

    eprintln!(
        "Compiling the dictionary with bucket size {}...",
        params.bucket_size
    );
    let start = Instant::now();
    let (dict, doc_ids) = Dictionary::from_params(&params)?;
    eprintln!("{} seconds", start.elapsed().as_secs_f64());
    eprintln!(
        "{} completions in {} buckets ({} bytes)",
        dict.len(),
        dict.num_buckets(),
        dict.size_in_bytes()
    );

    eprintln!("Writting the dictionary...: {:?}", &args.dict_out);
    let num_bytes = dict.write(BufWriter::new(File::create(args.dict_out)?))?;
    eprintln!("{} MiB", num_bytes as f64 / (1024. * 1024.));

    if let Some(docs_out) = args.docs_out {
        eprintln!("Writting the doc ids...: {docs_out:?}");
        let mut wtr = BufWriter::new(File::create(docs_out)?);
        bincode::encode_into_std_write(&doc_ids, &mut wtr, common::bincode_config())?;
    }

    Ok(())
}
