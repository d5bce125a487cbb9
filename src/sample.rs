/// Twelve months of 2024 sales used when no file is supplied
pub const SAMPLE_CSV: &str = "\
월,매출액,전년동월,증감률
2024-01,12000000,10500000,14.3
2024-02,13500000,11200000,20.5
2024-03,11000000,12800000,-14.1
2024-04,18000000,15200000,18.4
2024-05,21000000,18500000,13.5
2024-06,22000000,19000000,15.8
2024-07,25000000,20500000,22.0
2024-08,28000000,24500000,14.3
2024-09,24000000,21000000,14.3
2024-10,23000000,20000000,15.0
2024-11,19500000,17500000,11.4
2024-12,17000000,16500000,3.0
";
