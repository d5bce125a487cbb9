mod enrichment_properties;
