//! Canned payloads shaped like the remote services' responses.

use chrono::NaiveDate;
use cinedrop_core::{Genre, Movie, MovieId};
use serde_json::{Value, json};

/// Info-hash of the 1080p Inception release used across suites.
pub const INCEPTION_HASH_1080: &str = "c9f1a3e4b5d6c7e8f9a0b1c2d3e4f5a6b7c8d9e0";
/// Info-hash of the 720p Inception release used across suites.
pub const INCEPTION_HASH_720: &str = "0a1b2c3d4e5f60718293a4b5c6d7e8f901234567";

/// Minimal magnet URI carrying the given hash.
#[must_use]
pub fn magnet_for(hash: &str) -> String {
    format!("magnet:?xt=urn:btih:{hash}")
}

/// Inception as the metadata adapter normalises it.
#[must_use]
pub fn inception() -> Movie {
    Movie {
        id: MovieId(27_205),
        title: "Inception".to_string(),
        release_date: NaiveDate::from_ymd_opt(2010, 7, 15),
        overview: "A thief who steals corporate secrets through dream-sharing.".to_string(),
        poster_ref: Some("/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg".to_string()),
        genres: vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 878,
                name: "Science Fiction".to_string(),
            },
        ],
    }
}

/// A second title used to check ordering.
#[must_use]
pub fn inception_documentary() -> Movie {
    Movie {
        id: MovieId(64_956),
        title: "Inception: The Cobol Job".to_string(),
        release_date: None,
        overview: String::new(),
        poster_ref: None,
        genres: Vec::new(),
    }
}

/// `GET /search/movie` body for "inception".
#[must_use]
pub fn tmdb_search_inception() -> Value {
    json!({
        "page": 1,
        "total_pages": 1,
        "total_results": 2,
        "results": [
            {
                "id": 27205,
                "title": "Inception",
                "release_date": "2010-07-15",
                "overview": "A thief who steals corporate secrets through dream-sharing.",
                "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
                "genre_ids": [28, 878]
            },
            {
                "id": 64956,
                "title": "Inception: The Cobol Job",
                "release_date": "",
                "overview": "",
                "poster_path": null,
                "genre_ids": []
            }
        ]
    })
}

/// `GET /movie/27205` body.
#[must_use]
pub fn tmdb_movie_inception() -> Value {
    json!({
        "id": 27205,
        "title": "Inception",
        "release_date": "2010-07-15",
        "overview": "A thief who steals corporate secrets through dream-sharing.",
        "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
        "runtime": 148,
        "genres": [
            {"id": 28, "name": "Action"},
            {"id": 878, "name": "Science Fiction"},
            {"id": 12, "name": "Adventure"}
        ]
    })
}

/// `GET /list_movies.json` body listing both Inception releases.
#[must_use]
pub fn yts_list_inception() -> Value {
    json!({
        "status": "ok",
        "status_message": "Query was successful",
        "data": {
            "movie_count": 1,
            "movies": [
                {
                    "id": 1,
                    "title": "Inception",
                    "year": 2010,
                    "torrents": [
                        {
                            "hash": INCEPTION_HASH_720.to_uppercase(),
                            "quality": "720p",
                            "type": "bluray"
                        },
                        {
                            "hash": INCEPTION_HASH_1080.to_uppercase(),
                            "quality": "1080p",
                            "type": "bluray"
                        }
                    ]
                }
            ]
        }
    })
}

/// `GET /torrents/search/{q}` body from the Real-Debrid search endpoint.
#[must_use]
pub fn rd_search_inception() -> Value {
    json!([
        {
            "title": "Inception.2010.1080p.BluRay.x264",
            "magnet": format!("{}&dn=Inception", magnet_for(INCEPTION_HASH_1080))
        },
        {
            "title": "Inception.2010.2160p.UHD.BluRay",
            "magnet": "magnet:?xt=urn:btih:ffffeeeeddddccccbbbbaaaa9999888877776666"
        },
        {
            "title": "Inception.2010.broken",
            "magnet": "magnet:?dn=no-hash"
        }
    ])
}

/// `GET /torrents/info/{id}` body for the given remote status.
#[must_use]
pub fn rd_torrent_info(id: &str, status: &str, links: &[&str]) -> Value {
    json!({
        "id": id,
        "filename": "Inception.2010.1080p.BluRay.x264.mkv",
        "hash": INCEPTION_HASH_1080,
        "status": status,
        "progress": if status == "downloaded" { 100 } else { 42 },
        "links": links,
    })
}

/// `POST /unrestrict/link` body turning a hoster link into a direct download.
#[must_use]
pub fn rd_unrestrict(link: &str, download: &str) -> Value {
    json!({
        "id": "UNRESTRICT1",
        "filename": "Inception.2010.1080p.BluRay.x264.mkv",
        "mimeType": "video/x-matroska",
        "filesize": 2_147_483_648_u64,
        "link": link,
        "host": "real-debrid.com",
        "chunks": 32,
        "download": download,
        "streamable": 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_agree_on_identity() {
        let search = tmdb_search_inception();
        assert_eq!(search["results"][0]["id"], json!(inception().id.0));
        assert_eq!(tmdb_movie_inception()["title"], json!(inception().title));
        assert!(magnet_for(INCEPTION_HASH_720).ends_with(INCEPTION_HASH_720));
        assert_eq!(rd_torrent_info("X", "downloaded", &["https://a/b"])["progress"], json!(100));
        assert!(inception_documentary().release_date.is_none());
    }
}
