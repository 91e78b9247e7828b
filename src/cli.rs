use clap::*;

const FILTER_HELP: &str = "lyrebird filter: flag variants whose supporting reads look misplaced

Required:
   -v, --vcf <PATH>                      Sorted VCF callset to filter
   -b, --bam <PATH>                      Indexed BAM the callset was derived from.
                                         The reassembly bamout of the caller works
                                         best; the original bam may miss some indels
   -x, --realignment-index <PATH>        Stem of a bwa index built from the best
                                         available reference (run `bwa index` on it
                                         first). Need not match the bam's reference
   -o, --output <PATH>                   Output VCF path (.vcf, .vcf.gz or .bcf)

Classification:
   --indel-start-tolerance <INT>         Max distance between the start of an indel
                                         operation in a read and the variant position
                                         for the read to count as support [default: 5]

Decision policy:
   --min-discordant-reads <INT>          Filter a variant once this many supporting
                                         reads fail to realign confidently to their
                                         original locus [default: 2]
   --discordant-fraction <FLOAT>         Use a fraction of the supporting reads
                                         instead of an absolute count. Overrides
                                         --min-discordant-reads

Realignment:
   --min-realignment-mapq <INT>          Realignments below this mapping quality are
                                         counted as ambiguous [default: 30]
   --locus-shift-tolerance <INT>         How far a realigned start may drift from the
                                         original position and still count as the
                                         same locus [default: 100]

Other:
   -t, --threads <INT>                   Worker threads for per-variant realignment
                                         [default: 1]
   --verbose                             Print extra debugging information
   -q, --quiet                           Unless there is an error, do not print
                                         log messages

Example usage:

  lyrebird filter -v somatic.vcf.gz -b somatic_bamout.bam \\
      -x hg38.fasta -o filtered.vcf.gz
";

pub fn filter_full_help() -> &'static str {
    FILTER_HELP
}

pub fn build_cli() -> App<'static, 'static> {
    App::new("lyrebird")
        .version(crate_version!())
        .author("Rhys Allan <rhys.allan@protonmail.com>")
        .about("Filter alignment artifacts from variant callsets")
        .setting(AppSettings::ArgRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("filter")
                .about("Filter alignment artifacts from a VCF callset")
                .help(FILTER_HELP)
                .arg(
                    Arg::with_name("vcf")
                        .short("v")
                        .long("vcf")
                        .takes_value(true)
                        .required_unless_one(&["full-help"]),
                )
                .arg(
                    Arg::with_name("bam")
                        .short("b")
                        .long("bam")
                        .takes_value(true)
                        .required_unless_one(&["full-help"]),
                )
                .arg(
                    Arg::with_name("realignment-index")
                        .short("x")
                        .long("realignment-index")
                        .takes_value(true)
                        .required_unless_one(&["full-help"]),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .required_unless_one(&["full-help"]),
                )
                .arg(
                    Arg::with_name("indel-start-tolerance")
                        .long("indel-start-tolerance")
                        .takes_value(true)
                        .default_value("5"),
                )
                .arg(
                    Arg::with_name("min-discordant-reads")
                        .long("min-discordant-reads")
                        .takes_value(true)
                        .default_value("2"),
                )
                .arg(
                    Arg::with_name("discordant-fraction")
                        .long("discordant-fraction")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("min-realignment-mapq")
                        .long("min-realignment-mapq")
                        .takes_value(true)
                        .default_value("30"),
                )
                .arg(
                    Arg::with_name("locus-shift-tolerance")
                        .long("locus-shift-tolerance")
                        .takes_value(true)
                        .default_value("100"),
                )
                .arg(
                    Arg::with_name("threads")
                        .short("t")
                        .long("threads")
                        .takes_value(true)
                        .default_value("1"),
                )
                .arg(Arg::with_name("verbose").long("verbose"))
                .arg(Arg::with_name("quiet").short("q").long("quiet"))
                .arg(Arg::with_name("full-help").long("full-help")),
        )
}
