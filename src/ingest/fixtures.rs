/// Representative storm-event CSV payloads for tests.
///
/// Hand-trimmed to a realistic column subset: real yearly files carry more
/// columns (tornado scale, range/azimuth, ...), which flow through the
/// pipeline untyped exactly like the extras here.
///
/// The two yearly fixtures are designed for filter tests: each year holds
/// one event matching `EventOnly`, one matching only `DescriptionOnly`, and
/// one matching neither.

/// Year 1996: a Dust Storm, a High Wind with a dust narrative (same
/// episode), and a Hail event with no dust relevance.
///
/// The two episode-9001 events agree on STATE and EPISODE_NARRATIVE but
/// disagree on CZ_NAME, exercising the multiple-values sentinel.
pub fn fixture_year_1996() -> &'static str {
    r#"BEGIN_YEARMONTH,BEGIN_DAY,BEGIN_TIME,END_YEARMONTH,END_DAY,END_TIME,EPISODE_ID,EVENT_ID,STATE,STATE_FIPS,YEAR,EVENT_TYPE,CZ_NAME,WFO,BEGIN_DATE_TIME,CZ_TIMEZONE,END_DATE_TIME,INJURIES_DIRECT,INJURIES_INDIRECT,DEATHS_DIRECT,DEATHS_INDIRECT,DAMAGE_PROPERTY,DAMAGE_CROPS,BEGIN_LAT,BEGIN_LON,EPISODE_NARRATIVE,EVENT_NARRATIVE,DATA_SOURCE
199604,28,1430,199604,28,1500,9001,5600001,ARIZONA,4,1996,Dust Storm,MARICOPA,PSR,28-APR-96 14:30:00,MST,28-APR-96 15:00:00,2,0,0,0,5K,,33.45,-112.07,A strong pressure gradient produced widespread blowing dust.,A wall of dust moved across the valley and closed Interstate 10.,CSV
199604,28,1500,199604,28,1545,9001,5600002,ARIZONA,4,1996,High Wind,PINAL,PSR,28-APR-96 15:00:00,MST,28-APR-96 15:45:00,0,0,0,0,,1.5K,,,A strong pressure gradient produced widespread blowing dust.,"Gusts to 60 mph lifted dust, reducing visibility to a quarter mile.",CSV
199607,12,1615,199607,12,1620,9002,5600003,KANSAS,20,1996,Hail,SEDGWICK,ICT,12-JUL-96 16:15:00,CST,12-JUL-96 16:20:00,0,0,0,0,10K,,37.69,-97.34,Afternoon thunderstorms developed along a stalled front.,Quarter sized hail fell near Wichita.,CSV
"#
}

/// Year 1997: a Dust Devil, a Thunderstorm Wind whose episode narrative
/// mentions dust, and a Winter Weather event whose "dusting of snow" must
/// not match.
pub fn fixture_year_1997() -> &'static str {
    r#"BEGIN_YEARMONTH,BEGIN_DAY,BEGIN_TIME,END_YEARMONTH,END_DAY,END_TIME,EPISODE_ID,EVENT_ID,STATE,STATE_FIPS,YEAR,EVENT_TYPE,CZ_NAME,WFO,BEGIN_DATE_TIME,CZ_TIMEZONE,END_DATE_TIME,INJURIES_DIRECT,INJURIES_INDIRECT,DEATHS_DIRECT,DEATHS_INDIRECT,DAMAGE_PROPERTY,DAMAGE_CROPS,BEGIN_LAT,BEGIN_LON,EPISODE_NARRATIVE,EVENT_NARRATIVE,DATA_SOURCE
199706,3,1310,199706,3,1315,9101,5700001,NEVADA,32,1997,Dust Devil,CLARK,VEF,03-JUN-97 13:10:00,PST,03-JUN-97 13:15:00,0,0,0,0,0.5K,,36.17,-115.14,Hot and dry conditions prevailed across southern Nevada.,A dust devil overturned a shed roof at a construction site.,CSV
199708,19,1745,199708,19,1800,9102,5700002,TEXAS,48,1997,Thunderstorm Wind,LUBBOCK,LUB,19-AUG-97 17:45:00,CST,19-AUG-97 18:00:00,0,0,0,0,1M,,33.58,-101.85,Thunderstorm outflow raised a large dust cloud ahead of the gust front.,Power poles were snapped along FM 1585.,CSV
199712,24,600,199712,24,1200,9103,5700003,MICHIGAN,26,1997,Winter Weather,KENT,GRR,24-DEC-97 06:00:00,EST,24-DEC-97 12:00:00,0,0,0,0,,,42.96,-85.66,A weak clipper system crossed the Great Lakes.,A light dusting of snow fell on Christmas Eve.,CSV
"#
}
