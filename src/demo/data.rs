/// Demo `arcstats` contents
pub const DEMO_ARCSTATS: &str = r#"13 1 0x01 147 39984 5206542355 1095433357591428
name                            type data
hits                            4    958376421
misses                          4    41203389
demand_data_hits                4    612873001
demand_data_misses              4    20377412
prefetch_data_hits              4    1123044
prefetch_data_misses            4    9112233
size                            4    46301224960
c                               4    49910562816
c_min                           4    1073741824
c_max                           4    49910562816
l2_size                         4    0
arc_no_grow                     4    0
memory_throttle_count           4    0
"#;

/// Demo pools as (name, state file, io file)
pub const DEMO_POOLS: &[(&str, &str, &str)] = &[
    (
        "boot-pool",
        "ONLINE\n",
        r#"14 3 0x00 1 80 5213391234 1095437772178219
nread    nwritten reads    writes   wtime    wlentime wupdate  rtime    rlentime rupdate  wcnt     rcnt
3381940224 918294528 201044 88124 0 0 0 0 0 0 0 0
"#,
    ),
    (
        "data",
        "online\n",
        r#"15 3 0x00 1 80 5213392455 1095437772190011
nread    nwritten reads    writes   wtime    wlentime wupdate  rtime    rlentime rupdate  wcnt     rcnt
9823001337344 4410937712640 88213455 61002877 0 0 0 0 0 0 0 0
"#,
    ),
    (
        "usb-backup",
        "DEGRADED\n",
        r#"16 3 0x00 1 80 5213393001 1095437772201377
nread    nwritten reads    writes   wtime    wlentime wupdate  rtime    rlentime rupdate  wcnt     rcnt
120455168 77209600 4120 2233 0 0 0 0 0 0 0 0
"#,
    ),
];
