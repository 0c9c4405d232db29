#![forbid(unsafe_code)]
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::{env, ffi, fs};

use tvlzw::{base64, lzw_decode, lzw_encode};

/// Decoded length and bit count, both little endian `u32`.
const HEADER_LEN: usize = 8;

fn main() -> Outcome {
    env_logger::init();
    Outcome::guard(|| {
        let flags = Flags::from_args(env::args_os());
        run_coding(flags)
    })
}

fn run_coding(flags: Flags) -> Result<(), io::Error> {
    let input = match flags.input {
        Input::File(file) => fs::read(file)?,
        Input::Stdin => {
            let mut data = vec![];
            io::stdin().lock().read_to_end(&mut data)?;
            data
        }
    };

    let output = match flags.operation {
        Operation::Encode => encode_frame(&input)?,
        Operation::Decode if flags.base64 => decode_frame(&base64::decode(&input))?,
        Operation::Decode => decode_frame(&input)?,
    };
    log::info!("{} bytes in, {} bytes out", input.len(), output.len());

    let out = io::stdout();
    let mut out = out.lock();
    out.write_all(&output)?;
    out.flush()
}

fn encode_frame(data: &[u8]) -> Result<Vec<u8>, io::Error> {
    let len = u32::try_from(data.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "input exceeds 4 GiB"))?;
    let encoded = lzw_encode(data).map_err(invalid_data)?;

    let mut frame = Vec::with_capacity(HEADER_LEN + encoded.data.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&encoded.bits.to_le_bytes());
    frame.extend_from_slice(&encoded.data);
    Ok(frame)
}

fn decode_frame(frame: &[u8]) -> Result<Vec<u8>, io::Error> {
    if frame.len() < HEADER_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "frame shorter than its header",
        ));
    }

    let (header, payload) = frame.split_at(HEADER_LEN);
    let mut len = [0; 4];
    let mut bits = [0; 4];
    len.copy_from_slice(&header[..4]);
    bits.copy_from_slice(&header[4..]);
    let len = u32::from_le_bytes(len);
    let bits = u32::from_le_bytes(bits);

    let payload_len = u32::try_from(payload.len()).unwrap_or(u32::MAX);
    let decoded = lzw_decode(payload, payload_len, bits, len).map_err(invalid_data)?;
    if decoded.len() < len as usize {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("code stream ended after {} of {} bytes", decoded.len(), len),
        ));
    }

    Ok(decoded)
}

fn invalid_data(err: tvlzw::LzwError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

struct Flags {
    input: Input,
    operation: Operation,
    base64: bool,
}

#[derive(Debug)]
enum Input {
    File(PathBuf),
    Stdin,
}

#[derive(Debug)]
enum Operation {
    Encode,
    Decode,
}

fn command() -> clap::Command {
    clap::Command::new("lzw")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interact with headerless lzw frames")
        .arg(
            clap::Arg::new("decode")
                .short('d')
                .long("decode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("encode")
                .short('e')
                .long("encode")
                .action(clap::ArgAction::SetTrue),
        )
        .group(
            clap::ArgGroup::new("operation")
                .args(["decode", "encode"])
                .multiple(false)
                .required(true),
        )
        .arg(
            clap::Arg::new("base64")
                .long("base64")
                .help("The frame to decode is base64 text")
                .action(clap::ArgAction::SetTrue)
                .requires("decode"),
        )
        .arg(
            clap::Arg::new("file")
                .default_value("-")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

impl Flags {
    fn from_args(args: impl Iterator<Item = ffi::OsString>) -> Self {
        let matches = command().get_matches_from(args);

        let operation = if matches.get_flag("decode") {
            Operation::Decode
        } else {
            Operation::Encode
        };

        let input = match matches.get_one::<PathBuf>("file") {
            None => Input::Stdin,
            Some(p) if *p == PathBuf::from("-") => Input::Stdin,
            Some(p) => Input::File(p.clone()),
        };

        Flags {
            input,
            operation,
            base64: matches.get_flag("base64"),
        }
    }
}

/// How a run ended.
///
/// Exit status 2 means the frame was malformed, 3 that it ended before all bytes were decoded.
enum Outcome {
    Done,
    Failed(io::Error),
    Crashed,
}

impl Outcome {
    fn guard(op: fn() -> Result<(), io::Error>) -> Self {
        match std::panic::catch_unwind(op) {
            Ok(Ok(())) => Outcome::Done,
            Ok(Err(err)) => Outcome::Failed(err),
            Err(_) => Outcome::Crashed,
        }
    }

    fn exit_status(&self) -> u8 {
        match self {
            Outcome::Done => 0,
            Outcome::Failed(err) => match err.kind() {
                io::ErrorKind::InvalidData => 2,
                io::ErrorKind::UnexpectedEof => 3,
                _ => 1,
            },
            Outcome::Crashed => 101,
        }
    }
}

impl std::process::Termination for Outcome {
    fn report(self) -> std::process::ExitCode {
        match &self {
            Outcome::Done => {}
            Outcome::Failed(err) => eprintln!("lzw: {}", err),
            Outcome::Crashed => eprintln!("lzw: internal error"),
        }

        std::process::ExitCode::from(self.exit_status())
    }
}
