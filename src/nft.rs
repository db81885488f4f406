//! NFT records and the gallery presenter

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nft {
    pub id: String,
    #[serde(rename = "tokenId")]
    pub token_id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub collection: String,
    pub owner: String,
    #[serde(rename = "contractAddress")]
    pub contract_address: String,
}

/// Exactly one of these renders at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryView {
    Loading,
    NotConnected,
    Empty,
    Populated,
}

/// Presenter precedence: loading wins over everything, then the
/// connection check, then the empty state.
pub fn gallery_view(loading: bool, connected: bool, item_count: usize) -> GalleryView {
    if loading {
        GalleryView::Loading
    } else if !connected {
        GalleryView::NotConnected
    } else if item_count == 0 {
        GalleryView::Empty
    } else {
        GalleryView::Populated
    }
}

/// Seam for NFT listings. Returns a finite snapshot, not a stream.
pub trait NftSource: Send + Sync {
    fn list_owned(&self, owner: &str) -> Vec<Nft>;
}

const NFT_FIXTURE: &str = r#"[
  {
    "id": "1",
    "tokenId": "4201",
    "name": "Lumina #4201",
    "description": "A prismatic shard from the first Lumina drop, refracting light across eleven spectral bands.",
    "image": "https://images.nexus.example/lumina/4201.png",
    "collection": "Lumina Collection",
    "owner": "0x1234567890abcdef1234567890abcdef12345678",
    "contractAddress": "0x9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b"
  },
  {
    "id": "2",
    "tokenId": "4202",
    "name": "Lumina #4202",
    "description": "Twin helix of cold light suspended in obsidian glass.",
    "image": "https://images.nexus.example/lumina/4202.png",
    "collection": "Lumina Collection",
    "owner": "0x1234567890abcdef1234567890abcdef12345678",
    "contractAddress": "0x9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b"
  },
  {
    "id": "3",
    "tokenId": "4203",
    "name": "Lumina #4203",
    "description": "The aurora piece. Minted during the solstice window, one of twelve.",
    "image": "https://images.nexus.example/lumina/4203.png",
    "collection": "Lumina Collection",
    "owner": "0x1234567890abcdef1234567890abcdef12345678",
    "contractAddress": "0x9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b"
  },
  {
    "id": "4",
    "tokenId": "0877",
    "name": "Vanta Relic #0877",
    "description": "Matte-black monolith artifact recovered from the Vanta genesis series.",
    "image": "https://images.nexus.example/vanta/0877.png",
    "collection": "Vanta Relics",
    "owner": "0x1234567890abcdef1234567890abcdef12345678",
    "contractAddress": "0x1f2e3d4c5b6a79880990a1b2c3d4e5f607182934"
  },
  {
    "id": "5",
    "tokenId": "0912",
    "name": "Vanta Relic #0912",
    "description": "A fractured obelisk with gold inlay tracing the collapse equation.",
    "image": "https://images.nexus.example/vanta/0912.png",
    "collection": "Vanta Relics",
    "owner": "0x1234567890abcdef1234567890abcdef12345678",
    "contractAddress": "0x1f2e3d4c5b6a79880990a1b2c3d4e5f607182934"
  },
  {
    "id": "6",
    "tokenId": "0033",
    "name": "Meridian Key #0033",
    "description": "Opens one door, once. Nobody has found the door.",
    "image": "https://images.nexus.example/meridian/0033.png",
    "collection": "Meridian Keys",
    "owner": "0x1234567890abcdef1234567890abcdef12345678",
    "contractAddress": "0xabc123def456abc123def456abc123def456abc1"
  }
]"#;

/// Fixture-backed source standing in for an indexer or contract reads.
pub struct MockNftSource {
    items: Vec<Nft>,
}

impl MockNftSource {
    pub fn new() -> Self {
        let items: Vec<Nft> =
            serde_json::from_str(NFT_FIXTURE).expect("embedded NFT fixture is valid JSON");
        Self { items }
    }
}

impl Default for MockNftSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NftSource for MockNftSource {
    fn list_owned(&self, owner: &str) -> Vec<Nft> {
        self.items
            .iter()
            .map(|item| {
                let mut nft = item.clone();
                nft.owner = owner.to_string();
                nft
            })
            .collect()
    }
}
