use std::error::Error;
use std::fs::File;
use std::io::{prelude::*, BufReader};
use std::path::PathBuf;

use cadenza::common::MAX_NUM_TERMS;
use cadenza::Dictionary;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    name = "complete",
    about = "A program to answer prefix queries from stdin."
)]
struct Args {
    /// File from which the binary dictionary is read.
    #[clap(short = 'i', long)]
    dict_in: PathBuf,

    /// Maximum number of completions printed per query.
    #[clap(short = 'k', long, default_value_t = 10)]
    max_results: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let reader = BufReader::new(File::open(args.dict_in)?);
    let dict = Dictionary::read(reader)?;
    eprintln!(
        "Loaded {} completions in {} buckets",
        dict.len(),
        dict.num_buckets()
    );

    let mut buf = [0; MAX_NUM_TERMS];
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let mut terms = vec![];
        for col in line.split_whitespace() {
            terms.push(col.parse::<u32>()?);
        }

        match dict.locate(&terms) {
            Some(id) => println!("id\t{id}"),
            None => println!("id\t-"),
        }

        let range = dict.locate_prefix(&terms);
        if range.begin > range.end {
            println!("range\t-");
            continue;
        }
        println!("range\t[{}, {}]", range.begin, range.end);
        for id in (range.begin..=range.end).take(args.max_results as usize) {
            let len = dict.extract(id, &mut buf);
            let decoded: Vec<_> = buf[..len].iter().map(|t| t.to_string()).collect();
            println!("{id}\t{}", decoded.join(" "));
        }
    }

    Ok(())
}
