use bwtlz77::alphabet::Alphabet;
use bwtlz77::huffman::HuffmanTree;
use bwtlz77::io::{ByteReader, FileByteReader};
use bwtlz77::lz77::{self, Variant};
use bwtlz77::Error;
use clap::{arg, crate_version, Command};
use log::info;

const RCH: &str = "unreachable was reached";

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let long_help = "Examples:
---------
Count phrases:         `lz77 --v1 myfile.txt`
Progress every 1000:   `lz77 --v2 --p 1000 myfile.txt`
Print the parse:       `lz77 --print-parse --s 10 myfile.txt`";

    let main_cmd = Command::new("lz77")
        .about("Count LZ77 phrases via a dynamic, zero-order compressed BWT")
        .after_long_help(long_help)
        .version(crate_version!())
        .arg(arg!(--v1 "use the v1 variant (default)"))
        .arg(arg!(--v2 "use the v2 variant").conflicts_with("v1"))
        .arg(arg!(--p <N> "emit progress every N input characters").required(false))
        .arg(arg!(--s <C> "treat byte C as a separator").required(false))
        .arg(arg!(--"print-parse" "store and print the phrase list"))
        .arg(arg!(--verbose "enable logging"))
        .arg(arg!(<FILE> "input file"));

    let matches = main_cmd.get_matches();

    if matches.get_flag("verbose") {
        env_logger::init();
    }

    let variant = if matches.get_flag("v2") { Variant::V2 } else { Variant::V1 };
    let print_parse = matches.get_flag("print-parse");

    let progress_period = match matches.get_one::<String>("p") {
        Some(s) => Some(
            s.parse::<u64>()
                .map_err(|_| Error::MalformedOption(format!("--p expects an integer, got '{s}'")))?,
        ),
        None => None,
    };
    let separator = match matches.get_one::<String>("s") {
        Some(s) => Some(parse_separator(s)?),
        None => None,
    };

    let path = matches.get_one::<String>("FILE").expect(RCH);
    let file = std::fs::File::open(path).map_err(Error::Io)?;
    let mut reader = FileByteReader::new(file).map_err(Error::Io)?;

    if reader.size() == 0 {
        return Err(Error::InputEmpty);
    }

    let mut freq = [0u64; 256];
    while let Some(byte) = reader.get() {
        if separator != Some(byte) {
            freq[byte as usize] += 1;
        }
    }
    reader.rewind();

    let (alphabet, symbol_freq) = Alphabet::from_frequencies(&freq)?;
    let tree = HuffmanTree::build(&symbol_freq)?;
    info!("alphabet size = {}", alphabet.sigma());

    let sample_rate = if print_parse { 1 } else { 0 };
    let verbose = matches.get_flag("verbose");
    let total_size = reader.size();
    let result = lz77::parse(
        &mut reader,
        &alphabet,
        tree,
        variant,
        separator,
        progress_period,
        print_parse,
        sample_rate,
        |i, phrases| {
            println!("{i}\t{phrases}");
            if verbose {
                let pct = (i as f64 / total_size as f64) * 100.0;
                eprintln!("{pct:.1}%");
            }
        },
    );

    println!("Total number of LZ77 phrases = {}", result.phrase_count);

    if let Some(tokens) = result.tokens {
        let phrase_strs: Vec<String> = tokens
            .iter()
            .map(|t| String::from_utf8_lossy(&t.phrase).into_owned())
            .collect();
        println!("{}", phrase_strs.join(" "));
        let token_strs: Vec<String> = tokens
            .iter()
            .map(|t| {
                let pos = match (t.start_defined, t.start_position) {
                    (true, Some(p)) => p.to_string(),
                    _ => "-".to_string(),
                };
                format!("<{pos}, {}>", String::from_utf8_lossy(&t.phrase))
            })
            .collect();
        println!("{}", token_strs.join(" "));
    }

    Ok(())
}

fn parse_separator(s: &str) -> Result<u8, Error> {
    if let Ok(n) = s.parse::<u16>() {
        if n <= 255 {
            return Ok(n as u8);
        }
    }
    let bytes = s.as_bytes();
    if bytes.len() == 1 {
        return Ok(bytes[0]);
    }
    Err(Error::MalformedOption(format!(
        "--s expects a single byte or 0-255 integer, got '{s}'"
    )))
}
