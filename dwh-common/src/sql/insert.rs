//! INSERT...SELECT statements populating the star schema
//!
//! Every statement reads only from the staging tables, never from another
//! target table. Dimension rows are deduplicated with DISTINCT; a songplay
//! exists only when the event joins a staging song on title, artist name
//! and duration.
//!
//! The songs and artists inserts use `SELECT DISTINCT (col) col, ...`, which
//! the warehouse reads as DISTINCT over the whole row. Kept as-is.

/// NextSong events joined to the song catalog
pub const SONGPLAY_TABLE_INSERT: &str = r#"
INSERT INTO songplays (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
    SELECT DISTINCT TIMESTAMP 'epoch' + (e.ts / 1000) * INTERVAL '1 second' AS start_time,
        e.userId AS user_id,
        e.level AS level,
        s.song_id AS song_id,
        s.artist_id AS artist_id,
        e.sessionId AS session_id,
        e.location AS location,
        e.userAgent AS user_agent
    FROM staging_events e
    JOIN staging_songs s
    ON e.song = s.title
        AND e.artist = s.artist_name
        AND e.page = 'NextSong'
        AND e.length = s.duration
"#;

/// Users seen on NextSong events, independent of the song join
pub const USER_TABLE_INSERT: &str = r#"
INSERT INTO users (user_id, first_name, last_name, gender, level)
    SELECT DISTINCT (userId) AS user_id,
        firstName AS first_name,
        lastName AS last_name,
        gender,
        level
    FROM staging_events
    WHERE user_id IS NOT NULL
        AND page = 'NextSong'
"#;

pub const SONG_TABLE_INSERT: &str = r#"
INSERT INTO songs
    SELECT DISTINCT (song_id)
        song_id,
        title,
        artist_id,
        year,
        duration
    FROM staging_songs
"#;

pub const ARTIST_TABLE_INSERT: &str = r#"
INSERT INTO artists
    SELECT DISTINCT (artist_id)
        artist_id,
        artist_name,
        artist_location,
        artist_latitude,
        artist_longitude
    FROM staging_songs
"#;

/// Event timestamps decomposed into calendar units
pub const TIME_TABLE_INSERT: &str = r#"
INSERT INTO time
    WITH temp_time AS (
        SELECT TIMESTAMP 'epoch' + (ts / 1000 * INTERVAL '1 second') AS ts
        FROM staging_events
    )
    SELECT DISTINCT
        ts,
        EXTRACT(hour FROM ts),
        EXTRACT(day FROM ts),
        EXTRACT(week FROM ts),
        EXTRACT(month FROM ts),
        EXTRACT(year FROM ts),
        EXTRACT(weekday FROM ts)
    FROM temp_time
"#;
