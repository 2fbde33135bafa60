//! Embedded inputs for the small study area.
//!
//! Four zones in two regions, a six-edge road network connecting their
//! centroids, and a 7-household synthetic population in the CSV layout the
//! `lu-data` and `lu-spatial` loaders read.

pub const CONFIG_JSON: &str = r#"{
  "scenario_name": "small",
  "implementation": "munich",
  "base_year": 2011,
  "start_year": 2011,
  "end_year": 2021,
  "seed": 42,
  "number_of_threads": 2,
  "scaling_years": [2015, 2021],
  "skim_years": [2013, 2016, 2019],
  "transport_model_years": [2011, 2016],
  "summary_interval_years": 5,
  "write_synthetic_population": true,
  "synthetic_population_years": [2016]
}"#;

pub const NODES_CSV: &str = "\
id,lat,lon
10,30.700,-88.070
20,30.700,-88.050
30,30.680,-88.050
40,30.680,-88.030
50,30.690,-88.060
";

pub const EDGES_CSV: &str = "\
from,to,length_m,speed_kmh,oneway
10,20,1900,50,false
10,50,1500,40,false
50,30,1500,40,false
20,30,2200,60,false
30,40,1900,50,false
20,40,2900,70,false
";

pub const ZONES_CSV: &str = "\
zone,region,lat,lon,area_km2
1,1,30.700,-88.070,2.0
2,1,30.700,-88.050,1.5
3,2,30.680,-88.050,2.5
4,2,30.680,-88.030,3.0
";

pub const DWELLINGS_CSV: &str = "\
id,zone,lat,lon,household,type,bedrooms,quality,price,restriction,year_built
1,1,,,1,sfd,4,3,1450,0,1978
2,1,,,2,sfa,3,2,980,0,1985
3,1,30.701,-88.068,,mf234,2,2,720,0,1992
4,2,,,3,mf5plus,2,3,850,0,2004
5,2,,,4,mf5plus,1,2,610,0.6,2010
6,2,,,,mf5plus,2,3,880,0,2012
7,3,,,5,sfd,3,2,1100,0,1965
8,3,,,6,mh,2,1,430,0,1999
9,4,,,7,sfa,3,4,1320,0,2015
10,4,,,,sfd,4,3,1500,0,2018
";

pub const HOUSEHOLDS_CSV: &str = "\
id,dwelling,autos
1,1,2
2,2,1
3,4,1
4,5,0
5,7,2
6,8,1
7,9,2
";

pub const PERSONS_CSV: &str = "\
id,household,age,sex,role,income,license,job,school
1,1,44,female,married,62000,true,1,
2,1,46,male,married,48000,true,2,
3,1,14,female,child,0,false,,
4,1,11,male,child,0,false,,
5,2,31,male,single,39000,true,3,
6,3,27,female,married,41000,true,4,
7,3,29,male,married,36000,true,,
8,4,72,female,single,18000,false,,
9,5,52,male,married,55000,true,5,
10,5,50,female,married,47000,true,6,
11,5,19,male,child,8000,true,,
12,6,23,female,single,21000,true,7,
13,7,38,female,married,71000,true,,
14,7,40,male,married,66000,true,8,
15,7,2,female,child,0,false,,
";

pub const JOBS_CSV: &str = "\
id,zone,lat,lon,worker,sector
1,2,30.699,-88.051,1,office
2,2,,,2,office
3,3,,,5,retail
4,2,,,6,health
5,4,,,9,industry
6,3,,,10,retail
7,1,,,12,retail
8,2,,,14,office
9,4,,,,industry
10,3,,,,health
";

/// Household control totals by year.
pub const HOUSEHOLD_TARGETS: [(u32, usize); 2] = [(2015, 8), (2021, 9)];
